//! Code-generation primitives for Wrought.
//!
//! Everything here is engine-agnostic: symbols and symbol providers map
//! shapes to target-language names, reserved-word sets keep those names
//! legal, [`CodeWriter`] accumulates generated text, and [`TemplateEngine`]
//! is the seam concrete template engines (such as `wrought-codegen-tera`)
//! plug into.
//!
//! # Modules
//!
//! - [`error`] — the crate-wide [`CodegenError`]
//! - [`reserved`] — reserved-word detection and escaping
//! - [`symbol`] — symbols and symbol providers
//! - [`writer`] — indentation-aware code writing
//! - [`template`] — the [`TemplateEngine`] seam and default-data decorator

pub mod error;
pub mod reserved;
pub mod symbol;
pub mod template;
pub mod writer;

/// Model types used throughout this crate's API.
pub use wrought_model as model;

pub use error::CodegenError;
pub use reserved::{MappedReservedWords, ReservedWords, ReservedWordsBuilder};
pub use symbol::{ReservedWordSymbolProvider, Symbol, SymbolProvider};
pub use template::{DefaultDataTemplateEngine, TemplateEngine};
pub use writer::CodeWriter;
