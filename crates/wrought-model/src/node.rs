//! The untyped document data model.
//!
//! A [`Node`] is the JSON-shaped value layer that model documents, trait
//! values, and template data models are made of. Every node carries a
//! [`SourceLocation`] so diagnostics can point back into the document that
//! produced it.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::source::SourceLocation;

/// The kind of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Null => "null",
            NodeKind::Boolean => "boolean",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Array => "array",
            NodeKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Errors produced by node parsing and expectation accessors.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("expected {expected} node, found {actual} ({location})")]
    UnexpectedKind {
        expected: NodeKind,
        actual: NodeKind,
        location: SourceLocation,
    },
    #[error("missing required member '{member}' ({location})")]
    MissingMember {
        member: String,
        location: SourceLocation,
    },
    #[error("failed to parse JSON from '{filename}': {source}")]
    Json {
        filename: String,
        source: serde_json::Error,
    },
}

/// An untyped document value with a source location.
///
/// Equality compares values only; source locations are ignored.
#[derive(Debug, Clone)]
pub struct Node {
    value: NodeValue,
    location: SourceLocation,
}

/// The value held by a [`Node`].
///
/// Numbers reuse [`serde_json::Number`] so integer/float fidelity survives a
/// round trip through documents and template data models.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Null,
    Boolean(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<Node>),
    Object(BTreeMap<String, Node>),
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Node {
    /// A null node.
    pub fn null() -> Self {
        NodeValue::Null.into()
    }

    /// A string node.
    pub fn string(value: impl Into<String>) -> Self {
        NodeValue::String(value.into()).into()
    }

    /// An array node.
    pub fn array(values: Vec<Node>) -> Self {
        NodeValue::Array(values).into()
    }

    /// An object node.
    pub fn object(members: BTreeMap<String, Node>) -> Self {
        NodeValue::Object(members).into()
    }

    /// An empty object node.
    pub fn empty_object() -> Self {
        Self::object(BTreeMap::new())
    }

    /// Attach a source location, replacing the current one.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// The value held by this node.
    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    /// Where this node was defined.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The kind of this node.
    pub fn kind(&self) -> NodeKind {
        match &self.value {
            NodeValue::Null => NodeKind::Null,
            NodeValue::Boolean(_) => NodeKind::Boolean,
            NodeValue::Number(_) => NodeKind::Number,
            NodeValue::String(_) => NodeKind::String,
            NodeValue::Array(_) => NodeKind::Array,
            NodeValue::Object(_) => NodeKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        self.kind() == NodeKind::Null
    }

    pub fn is_object(&self) -> bool {
        self.kind() == NodeKind::Object
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.value {
            NodeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&serde_json::Number> {
        match &self.value {
            NodeValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            NodeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match &self.value {
            NodeValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Node>> {
        match &self.value {
            NodeValue::Object(members) => Some(members),
            _ => None,
        }
    }

    /// The string value, or an error naming the actual kind.
    pub fn expect_string(&self) -> Result<&str, NodeError> {
        self.as_str().ok_or_else(|| self.unexpected(NodeKind::String))
    }

    /// The array value, or an error naming the actual kind.
    pub fn expect_array(&self) -> Result<&[Node], NodeError> {
        self.as_array().ok_or_else(|| self.unexpected(NodeKind::Array))
    }

    /// The object members, or an error naming the actual kind.
    pub fn expect_object(&self) -> Result<&BTreeMap<String, Node>, NodeError> {
        self.as_object().ok_or_else(|| self.unexpected(NodeKind::Object))
    }

    /// Look up an object member. `None` when this is not an object or the
    /// member is absent.
    pub fn get_member(&self, name: &str) -> Option<&Node> {
        self.as_object().and_then(|members| members.get(name))
    }

    /// Look up an object member, failing when it is absent.
    pub fn expect_member(&self, name: &str) -> Result<&Node, NodeError> {
        self.get_member(name).ok_or_else(|| NodeError::MissingMember {
            member: name.to_string(),
            location: self.location.clone(),
        })
    }

    /// A string-valued object member, failing when absent or not a string.
    pub fn expect_string_member(&self, name: &str) -> Result<&str, NodeError> {
        self.expect_member(name)?.expect_string()
    }

    fn unexpected(&self, expected: NodeKind) -> NodeError {
        NodeError::UnexpectedKind {
            expected,
            actual: self.kind(),
            location: self.location.clone(),
        }
    }

    /// Parse a JSON document, attributing `filename` to every node.
    pub fn parse_json(text: &str, filename: &str) -> Result<Node, NodeError> {
        let value: Value = serde_json::from_str(text).map_err(|source| NodeError::Json {
            filename: filename.to_string(),
            source,
        })?;
        Ok(Self::from_json_value(value, &SourceLocation::file(filename)))
    }

    /// Convert a [`serde_json::Value`], attributing `location` to every node.
    pub fn from_json_value(value: Value, location: &SourceLocation) -> Node {
        let value = match value {
            Value::Null => NodeValue::Null,
            Value::Bool(b) => NodeValue::Boolean(b),
            Value::Number(n) => NodeValue::Number(n),
            Value::String(s) => NodeValue::String(s),
            Value::Array(values) => NodeValue::Array(
                values
                    .into_iter()
                    .map(|v| Self::from_json_value(v, location))
                    .collect(),
            ),
            Value::Object(members) => NodeValue::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, Self::from_json_value(v, location)))
                    .collect(),
            ),
        };
        Node {
            value,
            location: location.clone(),
        }
    }

    /// Convert to a [`serde_json::Value`], dropping source locations.
    pub fn to_json_value(&self) -> Value {
        match &self.value {
            NodeValue::Null => Value::Null,
            NodeValue::Boolean(b) => Value::Bool(*b),
            NodeValue::Number(n) => Value::Number(n.clone()),
            NodeValue::String(s) => Value::String(s.clone()),
            NodeValue::Array(values) => {
                Value::Array(values.iter().map(Node::to_json_value).collect())
            }
            NodeValue::Object(members) => Value::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
        }
    }
}

impl From<NodeValue> for Node {
    fn from(value: NodeValue) -> Self {
        Node {
            value,
            location: SourceLocation::none(),
        }
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        NodeValue::Boolean(value).into()
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        NodeValue::Number(value.into()).into()
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::string(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::string(value)
    }
}
