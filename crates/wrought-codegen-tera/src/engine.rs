//! The Tera-backed [`TemplateEngine`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use tera::Tera;
use tracing::debug;

use wrought_codegen_core::{CodegenError, TemplateEngine};
use wrought_model::Node;

use crate::filters;
use crate::value::context_from_node;

/// A [`TemplateEngine`] rendering `.tera` templates.
///
/// Templates come from a directory (every `*.tera` file, registered by file
/// name), from in-memory sources, or both. Engine-level default properties
/// merge into every render under keys the data model does not define.
///
/// ```
/// use wrought_codegen_tera::TeraEngine;
/// use wrought_codegen_core::TemplateEngine;
/// use wrought_model::Node;
///
/// let engine = TeraEngine::builder()
///     .template("greeting.txt.tera", "Hello, {{ name | pascal_case }}!")
///     .build()
///     .unwrap();
/// let data = Node::parse_json(r#"{"name": "wrought"}"#, "data.json").unwrap();
/// assert_eq!(engine.render("greeting.txt.tera", &data).unwrap(), "Hello, Wrought!");
/// ```
#[derive(Debug)]
pub struct TeraEngine {
    tera: Tera,
    defaults: BTreeMap<String, Node>,
}

impl TeraEngine {
    pub fn builder() -> TeraEngineBuilder {
        TeraEngineBuilder::default()
    }

    /// Names of every registered template, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }
}

impl TemplateEngine for TeraEngine {
    fn render(&self, template_path: &str, data: &Node) -> Result<String, CodegenError> {
        let provided = data.as_object().ok_or(CodegenError::InvalidData {
            kind: data.kind(),
        })?;

        let mut merged = self.defaults.clone();
        for (key, value) in provided {
            merged.insert(key.clone(), value.clone());
        }
        let context = context_from_node(&Node::object(merged))?;

        self.tera
            .render(template_path, &context)
            .map_err(|e| match &e.kind {
                tera::ErrorKind::TemplateNotFound(name) => CodegenError::UnknownTemplate {
                    template: name.clone(),
                },
                _ => CodegenError::Render {
                    template: template_path.to_string(),
                    message: error_chain(&e),
                },
            })
    }
}

/// Builder for [`TeraEngine`].
#[derive(Debug, Default)]
pub struct TeraEngineBuilder {
    templates_dir: Option<PathBuf>,
    raw_templates: Vec<(String, String)>,
    defaults: BTreeMap<String, Node>,
}

impl TeraEngineBuilder {
    /// Load every `*.tera` file in `dir`, registered by file name.
    pub fn templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = Some(dir.into());
        self
    }

    /// Register an in-memory template under `name`.
    pub fn template(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.raw_templates.push((name.into(), source.into()));
        self
    }

    /// Merge `value` into every render under `key` unless the data model
    /// defines it.
    pub fn default_property(mut self, key: impl Into<String>, value: Node) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }

    /// Load templates and register the case filters.
    pub fn build(self) -> Result<TeraEngine, CodegenError> {
        let mut tera = match &self.templates_dir {
            Some(dir) => {
                let glob = dir.join("*.tera").to_string_lossy().to_string();
                Tera::new(&glob).map_err(|e| CodegenError::TemplateLoad {
                    dir: dir.clone(),
                    message: error_chain(&e),
                })?
            }
            None => Tera::default(),
        };

        for (name, source) in &self.raw_templates {
            tera.add_raw_template(name, source)
                .map_err(|e| CodegenError::InvalidTemplate {
                    template: name.clone(),
                    message: error_chain(&e),
                })?;
        }

        filters::register_all(&mut tera);

        debug!(
            templates = tera.get_template_names().count(),
            defaults = self.defaults.len(),
            "built template engine"
        );
        Ok(TeraEngine {
            tera,
            defaults: self.defaults,
        })
    }
}

/// Flatten an error and its sources into one message; Tera's top-level
/// messages rarely carry the interesting part.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn data(json: &str) -> Node {
        Node::parse_json(json, "data.json").unwrap()
    }

    #[test]
    fn test_render_raw_template_with_filters() {
        let engine = TeraEngine::builder()
            .template(
                "struct.rs.tera",
                "pub struct {{ name | pascal_case }} { /* {{ name | snake_case }} */ }",
            )
            .build()
            .unwrap();
        let rendered = engine
            .render("struct.rs.tera", &data(r#"{"name": "city_record"}"#))
            .unwrap();
        assert_eq!(
            rendered,
            "pub struct CityRecord { /* city_record */ }"
        );
    }

    #[test]
    fn test_load_templates_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rs.tera"), "a: {{ x }}").unwrap();
        fs::write(dir.path().join("b.rs.tera"), "b: {{ x }}").unwrap();
        fs::write(dir.path().join("notes.md"), "not a template").unwrap();

        let engine = TeraEngine::builder()
            .templates_dir(dir.path())
            .build()
            .unwrap();
        assert_eq!(engine.template_names(), vec!["a.rs.tera", "b.rs.tera"]);

        let rendered = engine.render("a.rs.tera", &data(r#"{"x": 1}"#)).unwrap();
        assert_eq!(rendered, "a: 1");
    }

    #[test]
    fn test_empty_dir_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let engine = TeraEngine::builder()
            .templates_dir(dir.path())
            .build()
            .unwrap();
        assert!(engine.template_names().is_empty());
    }

    #[test]
    fn test_malformed_template_fails_build() {
        let err = TeraEngine::builder()
            .template("broken.tera", "{% for x %}")
            .build()
            .unwrap_err();
        match err {
            CodegenError::InvalidTemplate { template, .. } => {
                assert_eq!(template, "broken.tera");
            }
            other => panic!("expected InvalidTemplate, got {other}"),
        }
    }

    #[test]
    fn test_unknown_template() {
        let engine = TeraEngine::builder().build().unwrap();
        let err = engine.render("missing.tera", &data("{}")).unwrap_err();
        assert!(matches!(err, CodegenError::UnknownTemplate { .. }));
    }

    #[test]
    fn test_render_failure_names_template() {
        let engine = TeraEngine::builder()
            .template("needs.tera", "{{ absent_variable }}")
            .build()
            .unwrap();
        let err = engine.render("needs.tera", &data("{}")).unwrap_err();
        match err {
            CodegenError::Render { template, message } => {
                assert_eq!(template, "needs.tera");
                assert!(message.contains("absent_variable"));
            }
            other => panic!("expected Render, got {other}"),
        }
    }

    #[test]
    fn test_default_properties_merge_under_data() {
        let engine = TeraEngine::builder()
            .template("t.tera", "{{ license }} {{ name }}")
            .default_property("license", Node::string("MIT"))
            .default_property("name", Node::string("fallback"))
            .build()
            .unwrap();
        let rendered = engine
            .render("t.tera", &data(r#"{"name": "provided"}"#))
            .unwrap();
        assert_eq!(rendered, "MIT provided");
    }

    #[test]
    fn test_non_object_data_rejected() {
        let engine = TeraEngine::builder()
            .template("t.tera", "x")
            .build()
            .unwrap();
        let err = engine.render("t.tera", &Node::from(1)).unwrap_err();
        assert!(matches!(err, CodegenError::InvalidData { .. }));
    }
}
