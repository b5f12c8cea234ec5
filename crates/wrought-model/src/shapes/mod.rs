//! Shapes: the typed components of a model.
//!
//! A [`Shape`] pairs a [`ShapeId`] with a type-specific body
//! ([`ShapeKind`]), a trait map, and a source location. The set of shape
//! types is closed. Members of aggregate shapes live nested inside their
//! container as [`MemberShape`] values; `$member` shape IDs address them in
//! diagnostics only.

pub mod id;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::node::Node;
use crate::source::SourceLocation;

pub use id::{ShapeId, ShapeIdError};

/// The closed set of shape types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Blob,
    Boolean,
    String,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Timestamp,
    Document,
    List,
    Set,
    Map,
    Structure,
    Union,
    Service,
    Operation,
}

impl ShapeType {
    /// Whether this is a simple (non-aggregate, non-service) type.
    pub fn is_simple(self) -> bool {
        !matches!(
            self,
            ShapeType::List
                | ShapeType::Set
                | ShapeType::Map
                | ShapeType::Structure
                | ShapeType::Union
                | ShapeType::Service
                | ShapeType::Operation
        )
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeType::Blob => "blob",
            ShapeType::Boolean => "boolean",
            ShapeType::String => "string",
            ShapeType::Byte => "byte",
            ShapeType::Short => "short",
            ShapeType::Integer => "integer",
            ShapeType::Long => "long",
            ShapeType::Float => "float",
            ShapeType::Double => "double",
            ShapeType::BigInteger => "bigInteger",
            ShapeType::BigDecimal => "bigDecimal",
            ShapeType::Timestamp => "timestamp",
            ShapeType::Document => "document",
            ShapeType::List => "list",
            ShapeType::Set => "set",
            ShapeType::Map => "map",
            ShapeType::Structure => "structure",
            ShapeType::Union => "union",
            ShapeType::Service => "service",
            ShapeType::Operation => "operation",
        };
        f.write_str(name)
    }
}

/// Error for an unrecognized shape type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shape type '{0}'")]
pub struct UnknownShapeType(pub String);

impl FromStr for ShapeType {
    type Err = UnknownShapeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s {
            "blob" => ShapeType::Blob,
            "boolean" => ShapeType::Boolean,
            "string" => ShapeType::String,
            "byte" => ShapeType::Byte,
            "short" => ShapeType::Short,
            "integer" => ShapeType::Integer,
            "long" => ShapeType::Long,
            "float" => ShapeType::Float,
            "double" => ShapeType::Double,
            "bigInteger" => ShapeType::BigInteger,
            "bigDecimal" => ShapeType::BigDecimal,
            "timestamp" => ShapeType::Timestamp,
            "document" => ShapeType::Document,
            "list" => ShapeType::List,
            "set" => ShapeType::Set,
            "map" => ShapeType::Map,
            "structure" => ShapeType::Structure,
            "union" => ShapeType::Union,
            "service" => ShapeType::Service,
            "operation" => ShapeType::Operation,
            other => return Err(UnknownShapeType(other.to_string())),
        };
        Ok(ty)
    }
}

/// Errors from shape construction and trait access.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    #[error("'{ty}' is not a simple shape type")]
    NotSimple { ty: ShapeType },
    #[error("shape ID '{id}' must not contain a member")]
    UnexpectedMember { id: ShapeId },
    #[error("shape '{id}' is missing required trait '{trait_name}'")]
    MissingTrait { id: ShapeId, trait_name: String },
}

/// A member of an aggregate shape: a target shape ID plus member-level
/// traits.
///
/// Equality ignores source locations.
#[derive(Debug, Clone)]
pub struct MemberShape {
    target: ShapeId,
    traits: BTreeMap<String, Node>,
    source: SourceLocation,
}

impl PartialEq for MemberShape {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target && self.traits == other.traits
    }
}

impl MemberShape {
    pub fn new(target: ShapeId) -> Self {
        Self {
            target,
            traits: BTreeMap::new(),
            source: SourceLocation::none(),
        }
    }

    pub fn with_trait(mut self, name: impl Into<String>, value: Node) -> Self {
        self.traits.insert(name.into(), value);
        self
    }

    pub fn with_source(mut self, source: SourceLocation) -> Self {
        self.source = source;
        self
    }

    pub fn target(&self) -> &ShapeId {
        &self.target
    }

    pub fn traits(&self) -> &BTreeMap<String, Node> {
        &self.traits
    }

    pub fn get_trait(&self, name: &str) -> Option<&Node> {
        self.traits.get(name)
    }

    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.contains_key(name)
    }

    pub fn source(&self) -> &SourceLocation {
        &self.source
    }
}

/// The type-specific body of a [`Shape`].
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// A simple shape; the type is always one of the simple [`ShapeType`]s.
    Simple(ShapeType),
    List {
        member: MemberShape,
    },
    Set {
        member: MemberShape,
    },
    Map {
        key: MemberShape,
        value: MemberShape,
    },
    Structure {
        members: BTreeMap<String, MemberShape>,
    },
    Union {
        members: BTreeMap<String, MemberShape>,
    },
    Service {
        version: String,
        operations: Vec<ShapeId>,
    },
    Operation {
        input: Option<ShapeId>,
        output: Option<ShapeId>,
        errors: Vec<ShapeId>,
    },
}

/// A model component: ID, body, traits, source.
///
/// Equality ignores source locations so that identical redefinitions across
/// documents are tolerated by the assembler.
#[derive(Debug, Clone)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    traits: BTreeMap<String, Node>,
    source: SourceLocation,
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind && self.traits == other.traits
    }
}

impl Shape {
    fn from_kind(id: ShapeId, kind: ShapeKind) -> Result<Self, ShapeError> {
        if id.member().is_some() {
            return Err(ShapeError::UnexpectedMember { id });
        }
        Ok(Self {
            id,
            kind,
            traits: BTreeMap::new(),
            source: SourceLocation::none(),
        })
    }

    /// A simple shape of the given type.
    pub fn simple(id: ShapeId, ty: ShapeType) -> Result<Self, ShapeError> {
        if !ty.is_simple() {
            return Err(ShapeError::NotSimple { ty });
        }
        Self::from_kind(id, ShapeKind::Simple(ty))
    }

    pub fn list(id: ShapeId, member: MemberShape) -> Result<Self, ShapeError> {
        Self::from_kind(id, ShapeKind::List { member })
    }

    pub fn set(id: ShapeId, member: MemberShape) -> Result<Self, ShapeError> {
        Self::from_kind(id, ShapeKind::Set { member })
    }

    pub fn map(id: ShapeId, key: MemberShape, value: MemberShape) -> Result<Self, ShapeError> {
        Self::from_kind(id, ShapeKind::Map { key, value })
    }

    pub fn structure(
        id: ShapeId,
        members: impl IntoIterator<Item = (String, MemberShape)>,
    ) -> Result<Self, ShapeError> {
        Self::from_kind(
            id,
            ShapeKind::Structure {
                members: members.into_iter().collect(),
            },
        )
    }

    pub fn union(
        id: ShapeId,
        members: impl IntoIterator<Item = (String, MemberShape)>,
    ) -> Result<Self, ShapeError> {
        Self::from_kind(
            id,
            ShapeKind::Union {
                members: members.into_iter().collect(),
            },
        )
    }

    pub fn service(
        id: ShapeId,
        version: impl Into<String>,
        operations: Vec<ShapeId>,
    ) -> Result<Self, ShapeError> {
        Self::from_kind(
            id,
            ShapeKind::Service {
                version: version.into(),
                operations,
            },
        )
    }

    pub fn operation(
        id: ShapeId,
        input: Option<ShapeId>,
        output: Option<ShapeId>,
        errors: Vec<ShapeId>,
    ) -> Result<Self, ShapeError> {
        Self::from_kind(
            id,
            ShapeKind::Operation {
                input,
                output,
                errors,
            },
        )
    }

    /// Attach a trait value.
    pub fn with_trait(mut self, name: impl Into<String>, value: Node) -> Self {
        self.traits.insert(name.into(), value);
        self
    }

    pub fn with_source(mut self, source: SourceLocation) -> Self {
        self.source = source;
        self
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn source(&self) -> &SourceLocation {
        &self.source
    }

    /// The type tag for this shape's body.
    pub fn shape_type(&self) -> ShapeType {
        match &self.kind {
            ShapeKind::Simple(ty) => *ty,
            ShapeKind::List { .. } => ShapeType::List,
            ShapeKind::Set { .. } => ShapeType::Set,
            ShapeKind::Map { .. } => ShapeType::Map,
            ShapeKind::Structure { .. } => ShapeType::Structure,
            ShapeKind::Union { .. } => ShapeType::Union,
            ShapeKind::Service { .. } => ShapeType::Service,
            ShapeKind::Operation { .. } => ShapeType::Operation,
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self.kind, ShapeKind::Simple(_))
    }

    pub fn traits(&self) -> &BTreeMap<String, Node> {
        &self.traits
    }

    pub fn get_trait(&self, name: &str) -> Option<&Node> {
        self.traits.get(name)
    }

    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.contains_key(name)
    }

    pub fn expect_trait(&self, name: &str) -> Result<&Node, ShapeError> {
        self.get_trait(name).ok_or_else(|| ShapeError::MissingTrait {
            id: self.id.clone(),
            trait_name: name.to_string(),
        })
    }

    /// Named members of this shape. List/set yield `member`; maps yield
    /// `key` and `value`; structures and unions yield their declared names.
    pub fn members(&self) -> Vec<(&str, &MemberShape)> {
        match &self.kind {
            ShapeKind::List { member } | ShapeKind::Set { member } => vec![("member", member)],
            ShapeKind::Map { key, value } => vec![("key", key), ("value", value)],
            ShapeKind::Structure { members } | ShapeKind::Union { members } => {
                members.iter().map(|(k, v)| (k.as_str(), v)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Every shape ID this shape refers to: member targets, service
    /// operations, and operation input/output/errors.
    pub fn referenced_shapes(&self) -> Vec<&ShapeId> {
        match &self.kind {
            ShapeKind::Service { operations, .. } => operations.iter().collect(),
            ShapeKind::Operation {
                input,
                output,
                errors,
            } => input
                .iter()
                .chain(output.iter())
                .chain(errors.iter())
                .collect(),
            _ => self.members().into_iter().map(|(_, m)| m.target()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ShapeId {
        s.parse().unwrap()
    }

    #[test]
    fn test_simple_rejects_aggregate_types() {
        let err = Shape::simple(id("ns#Foo"), ShapeType::Structure).unwrap_err();
        assert!(matches!(err, ShapeError::NotSimple { .. }));
    }

    #[test]
    fn test_shape_id_must_not_have_member() {
        let err = Shape::simple(id("ns#Foo$bar"), ShapeType::String).unwrap_err();
        assert!(matches!(err, ShapeError::UnexpectedMember { .. }));
    }

    #[test]
    fn test_structure_members_and_references() {
        let shape = Shape::structure(
            id("ns#City"),
            [
                ("name".to_string(), MemberShape::new(id("wrought.api#String"))),
                (
                    "population".to_string(),
                    MemberShape::new(id("wrought.api#Integer")),
                ),
            ],
        )
        .unwrap();

        assert_eq!(shape.shape_type(), ShapeType::Structure);
        let members = shape.members();
        assert_eq!(members.len(), 2);
        let refs: Vec<String> = shape
            .referenced_shapes()
            .iter()
            .map(|r| r.to_string())
            .collect();
        assert!(refs.contains(&"wrought.api#String".to_string()));
    }

    #[test]
    fn test_operation_references() {
        let shape = Shape::operation(
            id("ns#GetForecast"),
            Some(id("ns#GetForecastInput")),
            Some(id("ns#GetForecastOutput")),
            vec![id("ns#NoSuchCity")],
        )
        .unwrap();
        assert_eq!(shape.referenced_shapes().len(), 3);
    }

    #[test]
    fn test_traits() {
        let shape = Shape::simple(id("ns#Name"), ShapeType::String)
            .unwrap()
            .with_trait("pattern", Node::string("^[a-z]+$"));
        assert!(shape.has_trait("pattern"));
        assert!(shape.expect_trait("pattern").is_ok());
        let err = shape.expect_trait("documentation").unwrap_err();
        assert!(err.to_string().contains("documentation"));
    }

    #[test]
    fn test_equality_ignores_source() {
        let a = Shape::simple(id("ns#A"), ShapeType::String).unwrap();
        let b = Shape::simple(id("ns#A"), ShapeType::String)
            .unwrap()
            .with_source(SourceLocation::file("other.json"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shape_type_parse_round_trip() {
        for name in ["blob", "bigInteger", "structure", "operation"] {
            let ty: ShapeType = name.parse().unwrap();
            assert_eq!(ty.to_string(), name);
        }
        assert!("tuple".parse::<ShapeType>().is_err());
    }
}
