//! Tera template-engine wiring for the Wrought code-generation framework.
//!
//! This crate plugs the [`tera`] engine into the `wrought-codegen-core`
//! seam: [`TeraEngine`] implements [`TemplateEngine`], model nodes adapt
//! into the render context, and case-conversion filters are registered on
//! every engine.
//!
//! `wrought-codegen-core` is re-exported as [`codegen_core`] (consumers of
//! this crate program against the seam, not against Tera); the model crate
//! is an implementation detail and is not re-exported.
//!
//! # Modules
//!
//! - [`engine`] — [`TeraEngine`] and its builder
//! - [`value`] — node-to-value adaption and context building

pub mod engine;
mod filters;
pub mod value;

/// The code-generation core this crate wires Tera into.
pub use wrought_codegen_core as codegen_core;

pub use engine::{TeraEngine, TeraEngineBuilder};
pub use wrought_codegen_core::{CodegenError, TemplateEngine};
