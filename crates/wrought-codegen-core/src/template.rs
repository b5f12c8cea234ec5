//! The template-engine seam.
//!
//! Engines render named templates from an object-node data model. The
//! concrete engine lives behind this trait so generators are written
//! against [`TemplateEngine`], not against a specific templating library.

use std::collections::BTreeMap;
use std::io;

use wrought_model::Node;

use crate::error::CodegenError;

/// Renders named templates from a data model.
///
/// The data model must be an object node; implementations return
/// [`CodegenError::InvalidData`] otherwise.
pub trait TemplateEngine {
    /// Render the template registered under `template_path`.
    fn render(&self, template_path: &str, data: &Node) -> Result<String, CodegenError>;

    /// Render and write the result to `writer`.
    fn write(
        &self,
        template_path: &str,
        writer: &mut dyn io::Write,
        data: &Node,
    ) -> Result<(), CodegenError> {
        let rendered = self.render(template_path, data)?;
        writer
            .write_all(rendered.as_bytes())
            .map_err(|source| CodegenError::Write {
                template: template_path.to_string(),
                source,
            })
    }
}

/// Decorates an engine, injecting default values into every data model.
///
/// Defaults apply only to keys the caller's data does not define; provided
/// data always wins.
#[derive(Debug)]
pub struct DefaultDataTemplateEngine<E> {
    engine: E,
    defaults: BTreeMap<String, Node>,
}

impl<E: TemplateEngine> DefaultDataTemplateEngine<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            defaults: BTreeMap::new(),
        }
    }

    /// Add a default key/value pair.
    pub fn put(mut self, key: impl Into<String>, value: Node) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }

    /// The wrapped engine.
    pub fn inner(&self) -> &E {
        &self.engine
    }
}

impl<E: TemplateEngine> TemplateEngine for DefaultDataTemplateEngine<E> {
    fn render(&self, template_path: &str, data: &Node) -> Result<String, CodegenError> {
        let provided = data.as_object().ok_or(CodegenError::InvalidData {
            kind: data.kind(),
        })?;
        let mut merged = self.defaults.clone();
        for (key, value) in provided {
            merged.insert(key.clone(), value.clone());
        }
        self.engine.render(template_path, &Node::object(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes the data model keys and values: `k=v;` pairs in key order.
    struct EchoEngine;

    impl TemplateEngine for EchoEngine {
        fn render(&self, _template_path: &str, data: &Node) -> Result<String, CodegenError> {
            let members = data.as_object().ok_or(CodegenError::InvalidData {
                kind: data.kind(),
            })?;
            let mut out = String::new();
            for (key, value) in members {
                out.push_str(key);
                out.push('=');
                out.push_str(value.as_str().unwrap_or("?"));
                out.push(';');
            }
            Ok(out)
        }
    }

    #[test]
    fn test_write_renders_into_writer() {
        let mut buffer = Vec::new();
        let data = Node::parse_json(r#"{"a": "1"}"#, "t.json").unwrap();
        EchoEngine.write("any", &mut buffer, &data).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "a=1;");
    }

    #[test]
    fn test_defaults_fill_absent_keys() {
        let engine = DefaultDataTemplateEngine::new(EchoEngine)
            .put("license", Node::string("MIT"))
            .put("author", Node::string("codegen"));
        let data = Node::parse_json(r#"{"author": "override"}"#, "t.json").unwrap();
        let rendered = engine.render("any", &data).unwrap();
        assert_eq!(rendered, "author=override;license=MIT;");
    }

    #[test]
    fn test_defaults_reject_non_object_data() {
        let engine = DefaultDataTemplateEngine::new(EchoEngine).put("k", Node::string("v"));
        let err = engine.render("any", &Node::string("not an object")).unwrap_err();
        assert!(matches!(err, CodegenError::InvalidData { .. }));
    }
}
