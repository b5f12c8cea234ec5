//! Semantic interface model for Wrought: nodes, shape IDs, shapes, traits,
//! assembly, and validation.
//!
//! This crate is the model layer of the Wrought code-generation framework.
//! It has no opinion about generated output; `wrought-codegen-core` and the
//! engine crates build on the types defined here.
//!
//! # Modules
//!
//! - [`node`] — the untyped JSON-shaped document data model
//! - [`shapes`] — shape IDs, shape types, shapes, and members
//! - [`traits`] — the built-in trait registry
//! - [`model`] — the immutable model container
//! - [`loader`] — the JSON document format and the prelude
//! - [`assembler`] — multi-source model assembly and merging
//! - [`validation`] — severities, events, and [`ValidatedResult`]
//! - [`source`] — source locations for diagnostics

pub mod assembler;
pub mod loader;
pub mod model;
pub mod node;
pub mod shapes;
pub mod source;
pub mod traits;
pub mod validation;

pub use assembler::ModelAssembler;
pub use loader::{LoadError, DOCUMENT_VERSION, PRELUDE_NAMESPACE};
pub use model::{Model, ModelError};
pub use node::{Node, NodeError, NodeKind, NodeValue};
pub use shapes::{
    MemberShape, Shape, ShapeError, ShapeId, ShapeIdError, ShapeKind, ShapeType,
};
pub use source::SourceLocation;
pub use validation::{Severity, ValidatedResult, ValidationEvent, ValidationFailure};
