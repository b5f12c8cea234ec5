//! The crate-wide code-generation error type.

use std::path::PathBuf;

use wrought_model::NodeKind;

/// Errors produced while preparing or running code generation.
///
/// Template engines map their native errors into these variants so callers
/// handle one error type regardless of the engine behind the seam.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("failed to load templates from '{}': {message}", dir.display())]
    TemplateLoad { dir: PathBuf, message: String },
    #[error("invalid template '{template}': {message}")]
    InvalidTemplate { template: String, message: String },
    #[error("no template registered under '{template}'")]
    UnknownTemplate { template: String },
    #[error("failed to render template '{template}': {message}")]
    Render { template: String, message: String },
    #[error("template data must be an object node, found {kind}")]
    InvalidData { kind: NodeKind },
    #[error("failed to write rendered template '{template}': {source}")]
    Write {
        template: String,
        source: std::io::Error,
    },
    #[error("failed to read reserved words from '{}': {source}", path.display())]
    WordList {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("symbol is missing required property '{property}'")]
    IncompleteSymbol { property: String },
}
