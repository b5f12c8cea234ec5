//! JSON model document loading and the built-in prelude.
//!
//! A model document is a JSON object:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "metadata": { "authors": ["..."] },
//!   "shapes": {
//!     "example.weather#City": {
//!       "type": "structure",
//!       "members": {
//!         "name": { "target": "wrought.api#String", "traits": { "required": true } }
//!       },
//!       "traits": { "documentation": "A city that reports weather." }
//!     }
//!   }
//! }
//! ```
//!
//! Simple shapes take no body beyond `type` and optional `traits`. The
//! prelude namespace `wrought.api` supplies the standard simple shapes so
//! documents can target them without declaring them.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use crate::node::{Node, NodeError};
use crate::shapes::{MemberShape, Shape, ShapeError, ShapeId, ShapeIdError, ShapeType};

/// The only supported document version.
pub const DOCUMENT_VERSION: &str = "1.0";

/// The namespace of the built-in prelude shapes.
pub const PRELUDE_NAMESPACE: &str = "wrought.api";

const PRELUDE_SIMPLE_SHAPES: &[(&str, ShapeType)] = &[
    ("Blob", ShapeType::Blob),
    ("Boolean", ShapeType::Boolean),
    ("String", ShapeType::String),
    ("Byte", ShapeType::Byte),
    ("Short", ShapeType::Short),
    ("Integer", ShapeType::Integer),
    ("Long", ShapeType::Long),
    ("Float", ShapeType::Float),
    ("Double", ShapeType::Double),
    ("BigInteger", ShapeType::BigInteger),
    ("BigDecimal", ShapeType::BigDecimal),
    ("Timestamp", ShapeType::Timestamp),
    ("Document", ShapeType::Document),
];

/// The standard simple shapes injected by the assembler unless the prelude
/// is disabled.
pub(crate) fn prelude_shapes() -> Vec<Shape> {
    PRELUDE_SIMPLE_SHAPES
        .iter()
        .filter_map(|(name, ty)| {
            Shape::simple(ShapeId::new_unchecked(PRELUDE_NAMESPACE, name), *ty).ok()
        })
        .collect()
}

/// Errors from reading or interpreting a model document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read model file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported model document version '{version}' in '{name}'")]
    UnsupportedVersion { name: String, version: String },
    #[error("invalid shape ID '{id}' in '{name}': {source}")]
    InvalidShapeId {
        name: String,
        id: String,
        source: ShapeIdError,
    },
    #[error("shape '{id}': unknown shape type '{ty}'")]
    UnknownShapeType { id: ShapeId, ty: String },
    #[error("shape '{id}' is missing required property '{property}'")]
    MissingProperty { id: ShapeId, property: String },
    #[error(transparent)]
    Node(#[from] NodeError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Metadata and shapes extracted from one document.
#[derive(Debug, Default)]
pub(crate) struct LoadedDocument {
    pub metadata: BTreeMap<String, Node>,
    pub shapes: Vec<Shape>,
}

/// Interpret a parsed document node. `name` identifies the document in
/// diagnostics (a path or a caller-supplied label).
pub(crate) fn load_document(node: &Node, name: &str) -> Result<LoadedDocument, LoadError> {
    let members = node.expect_object()?;

    let version = node.expect_string_member("version")?;
    if version != DOCUMENT_VERSION {
        return Err(LoadError::UnsupportedVersion {
            name: name.to_string(),
            version: version.to_string(),
        });
    }

    let mut document = LoadedDocument::default();

    if let Some(metadata) = members.get("metadata") {
        document.metadata = metadata.expect_object()?.clone();
    }

    if let Some(shapes) = members.get("shapes") {
        for (raw_id, body) in shapes.expect_object()? {
            let id = ShapeId::from_str(raw_id).map_err(|source| LoadError::InvalidShapeId {
                name: name.to_string(),
                id: raw_id.clone(),
                source,
            })?;
            document.shapes.push(load_shape(id, body)?);
        }
    }

    tracing::debug!(
        document = name,
        shapes = document.shapes.len(),
        metadata = document.metadata.len(),
        "loaded model document"
    );
    Ok(document)
}

fn load_shape(id: ShapeId, body: &Node) -> Result<Shape, LoadError> {
    let ty_name = body.expect_string_member("type")?;
    let ty = ShapeType::from_str(ty_name).map_err(|_| LoadError::UnknownShapeType {
        id: id.clone(),
        ty: ty_name.to_string(),
    })?;

    let shape = match ty {
        _ if ty.is_simple() => Shape::simple(id, ty)?,
        ShapeType::List => Shape::list(id.clone(), required_member(&id, body, "member")?)?,
        ShapeType::Set => Shape::set(id.clone(), required_member(&id, body, "member")?)?,
        ShapeType::Map => Shape::map(
            id.clone(),
            required_member(&id, body, "key")?,
            required_member(&id, body, "value")?,
        )?,
        ShapeType::Structure => Shape::structure(id, named_members(body)?)?,
        ShapeType::Union => Shape::union(id, named_members(body)?)?,
        ShapeType::Service => {
            let version = body
                .get_member("version")
                .ok_or_else(|| LoadError::MissingProperty {
                    id: id.clone(),
                    property: "version".to_string(),
                })?
                .expect_string()?;
            Shape::service(id, version, id_list(body, "operations")?)?
        }
        ShapeType::Operation => Shape::operation(
            id,
            optional_id(body, "input")?,
            optional_id(body, "output")?,
            id_list(body, "errors")?,
        )?,
        // is_simple() covered every remaining type above
        _ => unreachable!("non-simple shape type {ty} not handled"),
    };

    Ok(apply_traits(shape, body)?.with_source(body.location().clone()))
}

fn apply_traits(mut shape: Shape, body: &Node) -> Result<Shape, LoadError> {
    if let Some(traits) = body.get_member("traits") {
        for (name, value) in traits.expect_object()? {
            shape = shape.with_trait(name.clone(), value.clone());
        }
    }
    Ok(shape)
}

fn load_member(node: &Node) -> Result<MemberShape, LoadError> {
    let target: ShapeId = node
        .expect_string_member("target")?
        .parse()
        .map_err(|source| LoadError::InvalidShapeId {
            name: node.location().filename().to_string(),
            id: node
                .get_member("target")
                .and_then(Node::as_str)
                .unwrap_or_default()
                .to_string(),
            source,
        })?;

    let mut member = MemberShape::new(target).with_source(node.location().clone());
    if let Some(traits) = node.get_member("traits") {
        for (name, value) in traits.expect_object()? {
            member = member.with_trait(name.clone(), value.clone());
        }
    }
    Ok(member)
}

fn required_member(id: &ShapeId, body: &Node, property: &str) -> Result<MemberShape, LoadError> {
    let node = body
        .get_member(property)
        .ok_or_else(|| LoadError::MissingProperty {
            id: id.clone(),
            property: property.to_string(),
        })?;
    load_member(node)
}

fn named_members(body: &Node) -> Result<Vec<(String, MemberShape)>, LoadError> {
    let mut members = Vec::new();
    if let Some(node) = body.get_member("members") {
        for (name, value) in node.expect_object()? {
            members.push((name.clone(), load_member(value)?));
        }
    }
    Ok(members)
}

fn optional_id(body: &Node, property: &str) -> Result<Option<ShapeId>, LoadError> {
    match body.get_member(property) {
        None => Ok(None),
        Some(node) => {
            let raw = node.expect_string()?;
            let id = raw.parse().map_err(|source| LoadError::InvalidShapeId {
                name: node.location().filename().to_string(),
                id: raw.to_string(),
                source,
            })?;
            Ok(Some(id))
        }
    }
}

fn id_list(body: &Node, property: &str) -> Result<Vec<ShapeId>, LoadError> {
    let mut ids = Vec::new();
    if let Some(node) = body.get_member(property) {
        for entry in node.expect_array()? {
            let raw = entry.expect_string()?;
            let id = raw.parse().map_err(|source| LoadError::InvalidShapeId {
                name: entry.location().filename().to_string(),
                id: raw.to_string(),
                source,
            })?;
            ids.push(id);
        }
    }
    Ok(ids)
}
