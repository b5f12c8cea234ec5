//! Full pipeline: assemble a model, map shapes to symbols, and render
//! generated source through the Tera engine.

use std::collections::BTreeMap;
use std::fs;

use wrought_codegen_core::model::{Model, Node, Shape, ShapeType};
use wrought_codegen_core::{
    DefaultDataTemplateEngine, MappedReservedWords, ReservedWordSymbolProvider, Symbol,
    SymbolProvider, TemplateEngine,
};
use wrought_codegen_tera::TeraEngine;

const MODEL_DOC: &str = r#"{
    "version": "1.0",
    "shapes": {
        "example.weather#City": {
            "type": "structure",
            "members": {
                "name": { "target": "wrought.api#String", "traits": { "required": true } },
                "population": { "target": "wrought.api#Long" },
                "type": { "target": "wrought.api#String" }
            },
            "traits": { "documentation": "A city that reports weather." }
        }
    }
}"#;

const STRUCT_TEMPLATE: &str = "\
// {{ banner }}
{% if documentation %}/// {{ documentation }}
{% endif %}pub struct {{ name | pascal_case }} {
{% for field in fields %}    pub {{ field.name }}: {{ field.target }},
{% endfor %}}
";

/// Maps shapes to Rust-flavored symbols.
struct RustSymbols;

impl SymbolProvider for RustSymbols {
    fn to_symbol(&self, shape: &Shape) -> Symbol {
        Symbol::builder()
            .name(shape.id().name())
            .namespace(shape.id().namespace().replace('.', "::"), "::")
            .definition_file(format!("src/{}.rs", shape.id().name().to_lowercase()))
            .build()
            .unwrap()
    }
}

fn assemble() -> Model {
    Model::assembler()
        .add_unparsed_model("weather.json", MODEL_DOC)
        .assemble()
        .into_result()
        .unwrap()
}

/// Build the template data model for one structure shape.
fn structure_data(model: &Model, provider: &impl SymbolProvider, shape: &Shape) -> Node {
    let symbol = provider.to_symbol(shape);
    let mut data = BTreeMap::new();
    data.insert("name".to_string(), Node::string(symbol.name()));
    if let Some(docs) = shape.get_trait("documentation").and_then(Node::as_str) {
        data.insert("documentation".to_string(), Node::string(docs));
    }

    let mut fields = Vec::new();
    for (member_name, member) in shape.members() {
        let target = model.expect_shape(member.target()).unwrap();
        let mut field = BTreeMap::new();
        field.insert(
            "name".to_string(),
            Node::string(provider.to_member_name(member_name, member)),
        );
        field.insert("target".to_string(), Node::string(target.id().name()));
        fields.push(Node::object(field));
    }
    data.insert("fields".to_string(), Node::array(fields));
    Node::object(data)
}

#[test]
fn renders_structure_from_assembled_model() {
    let model = assemble();
    let provider = ReservedWordSymbolProvider::new(RustSymbols).member_reserved_words(
        MappedReservedWords::builder().put("type", "r#type").build(),
    );

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("struct.rs.tera"), STRUCT_TEMPLATE).unwrap();

    let engine = TeraEngine::builder()
        .templates_dir(dir.path())
        .default_property("banner", Node::string("generated by wrought"))
        .build()
        .unwrap();

    let city = model
        .shapes_of_type(ShapeType::Structure)
        .find(|s| s.id().name() == "City")
        .unwrap();
    let data = structure_data(&model, &provider, city);
    let rendered = engine.render("struct.rs.tera", &data).unwrap();

    assert!(rendered.starts_with("// generated by wrought\n"));
    assert!(rendered.contains("/// A city that reports weather."));
    assert!(rendered.contains("pub struct City {"));
    assert!(rendered.contains("pub name: String,"));
    assert!(rendered.contains("pub population: Long,"));
    // Reserved member name escaped by the symbol provider.
    assert!(rendered.contains("pub r#type: String,"));
}

#[test]
fn default_data_engine_composes_with_tera() {
    let engine = TeraEngine::builder()
        .template("mod.rs.tera", "// {{ license }}\npub mod {{ module }};\n")
        .build()
        .unwrap();
    let engine = DefaultDataTemplateEngine::new(engine).put("license", Node::string("MIT"));

    let data = Node::parse_json(r#"{"module": "city"}"#, "data.json").unwrap();
    let rendered = engine.render("mod.rs.tera", &data).unwrap();
    assert_eq!(rendered, "// MIT\npub mod city;\n");
}

#[test]
fn write_targets_io_writer() {
    let engine = TeraEngine::builder()
        .template("t.tera", "{{ name | shouty_snake_case }}")
        .build()
        .unwrap();
    let data = Node::parse_json(r#"{"name": "maxRetries"}"#, "data.json").unwrap();

    let mut out = Vec::new();
    engine.write("t.tera", &mut out, &data).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "MAX_RETRIES");
}

#[test]
fn unknown_template_is_a_codegen_error() {
    let engine = TeraEngine::builder().build().unwrap();
    let data = Node::empty_object();
    let err = engine.render("missing.tera", &data).unwrap_err();
    assert!(err.to_string().contains("missing.tera"));
}
