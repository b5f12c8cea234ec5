//! End-to-end assembly: documents from disk and memory, merged and
//! validated into one model.

use std::io::Write;

use wrought_model::{Model, Node, Severity, ShapeId, ShapeType};

const WEATHER_DOC: &str = r#"{
    "version": "1.0",
    "metadata": { "authors": ["weather-team"] },
    "shapes": {
        "example.weather#CityName": {
            "type": "string",
            "traits": { "pattern": "^[A-Za-z ]+$" }
        },
        "example.weather#City": {
            "type": "structure",
            "members": {
                "name": { "target": "example.weather#CityName", "traits": { "required": true } },
                "population": { "target": "wrought.api#Long" }
            },
            "traits": { "documentation": "A city that reports weather." }
        },
        "example.weather#GetForecastInput": {
            "type": "structure",
            "members": {
                "city": { "target": "example.weather#CityName", "traits": { "required": true } }
            }
        },
        "example.weather#GetForecastOutput": {
            "type": "structure",
            "members": {
                "chanceOfRain": { "target": "wrought.api#Float" }
            }
        },
        "example.weather#NoSuchCity": {
            "type": "structure",
            "members": {
                "message": { "target": "wrought.api#String" }
            },
            "traits": { "error": "client" }
        },
        "example.weather#GetForecast": {
            "type": "operation",
            "input": "example.weather#GetForecastInput",
            "output": "example.weather#GetForecastOutput",
            "errors": ["example.weather#NoSuchCity"]
        },
        "example.weather#Weather": {
            "type": "service",
            "version": "2024-08-07",
            "operations": ["example.weather#GetForecast"]
        }
    }
}"#;

fn id(s: &str) -> ShapeId {
    s.parse().unwrap()
}

#[test]
fn assembles_service_closure_from_memory() {
    let model = Model::assembler()
        .add_unparsed_model("weather.json", WEATHER_DOC)
        .assemble()
        .into_result()
        .unwrap();

    let service = model.expect_shape(&id("example.weather#Weather")).unwrap();
    assert_eq!(service.shape_type(), ShapeType::Service);

    let city = model.expect_shape(&id("example.weather#City")).unwrap();
    assert_eq!(city.members().len(), 2);
    assert_eq!(
        city.get_trait("documentation").and_then(Node::as_str),
        Some("A city that reports weather.")
    );

    // Prelude targets resolved without being declared.
    assert!(model.contains_shape(&id("wrought.api#Long")));
}

#[test]
fn assembles_from_file_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weather.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(WEATHER_DOC.as_bytes()).unwrap();

    let model = Model::assembler()
        .add_import(&path)
        .assemble()
        .into_result()
        .unwrap();
    assert!(model.contains_shape(&id("example.weather#Weather")));

    // Shape sources point at the imported file.
    let shape = model.expect_shape(&id("example.weather#City")).unwrap();
    assert!(shape.source().filename().ends_with("weather.json"));
}

#[test]
fn missing_import_becomes_invalid_document_event() {
    let result = Model::assembler()
        .add_import("/nonexistent/weather.json")
        .assemble();
    assert!(result.result().is_none());
    let event = result
        .events()
        .iter()
        .find(|e| e.id() == "InvalidDocument")
        .unwrap();
    assert_eq!(event.severity(), Severity::Error);
    assert!(event.message().contains("/nonexistent/weather.json"));
}

#[test]
fn merges_supplemental_document() {
    let supplement = r#"{
        "version": "1.0",
        "metadata": { "authors": ["codegen-team"] },
        "shapes": {
            "example.weather#Cities": {
                "type": "list",
                "member": { "target": "example.weather#City" }
            }
        }
    }"#;

    let model = Model::assembler()
        .add_unparsed_model("weather.json", WEATHER_DOC)
        .add_unparsed_model("supplement.json", supplement)
        .assemble()
        .into_result()
        .unwrap();

    assert!(model.contains_shape(&id("example.weather#Cities")));
    let authors = model.metadata_value("authors").unwrap().as_array().unwrap();
    assert_eq!(authors.len(), 2);
}

#[test]
fn structure_counts_exclude_prelude() {
    let model = Model::assembler()
        .add_unparsed_model("weather.json", WEATHER_DOC)
        .assemble()
        .into_result()
        .unwrap();
    let structures: Vec<_> = model
        .shapes_of_type(ShapeType::Structure)
        .map(|s| s.id().to_string())
        .collect();
    assert_eq!(structures.len(), 4);
    assert!(structures.contains(&"example.weather#City".to_string()));
}
