//! Absolute shape identifiers.
//!
//! A shape ID is `namespace#name`, optionally suffixed with `$member` to
//! address a member of an aggregate shape, e.g.
//! `example.weather#GetForecast$city`. Namespaces are dot-separated
//! identifiers; every identifier matches `[A-Za-z_][A-Za-z0-9_]*`.

use std::fmt;
use std::str::FromStr;

/// Errors from parsing or constructing a [`ShapeId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeIdError {
    #[error("shape ID '{id}' is missing a '#' between namespace and name")]
    MissingNamespace { id: String },
    #[error("shape ID '{id}' has an invalid namespace segment '{segment}'")]
    InvalidNamespace { id: String, segment: String },
    #[error("shape ID '{id}' has an invalid shape name '{name}'")]
    InvalidName { id: String, name: String },
    #[error("shape ID '{id}' has an invalid member name '{member}'")]
    InvalidMember { id: String, member: String },
}

/// An absolute shape identifier.
///
/// Ordering is total (namespace, then name, then member), so shape maps keyed
/// by ID iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId {
    namespace: String,
    name: String,
    member: Option<String>,
}

impl ShapeId {
    /// Build an ID from a namespace and shape name, validating both.
    pub fn new(namespace: &str, name: &str) -> Result<Self, ShapeIdError> {
        let id = format!("{namespace}#{name}");
        validate_namespace(namespace, &id)?;
        if !is_identifier(name) {
            return Err(ShapeIdError::InvalidName {
                id,
                name: name.to_string(),
            });
        }
        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            member: None,
        })
    }

    /// Build an ID from parts known to be valid (prelude construction).
    pub(crate) fn new_unchecked(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            member: None,
        }
    }

    /// A copy of this ID addressing `member`, validating the member name.
    pub fn with_member(&self, member: &str) -> Result<Self, ShapeIdError> {
        if !is_identifier(member) {
            return Err(ShapeIdError::InvalidMember {
                id: self.to_string(),
                member: member.to_string(),
            });
        }
        Ok(Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: Some(member.to_string()),
        })
    }

    /// A copy of this ID with any member suffix removed.
    pub fn without_member(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: None,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.name)?;
        if let Some(member) = &self.member {
            write!(f, "${member}")?;
        }
        Ok(())
    }
}

impl FromStr for ShapeId {
    type Err = ShapeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, rest) = s.split_once('#').ok_or_else(|| {
            ShapeIdError::MissingNamespace { id: s.to_string() }
        })?;
        validate_namespace(namespace, s)?;

        let (name, member) = match rest.split_once('$') {
            Some((name, member)) => (name, Some(member)),
            None => (rest, None),
        };
        if !is_identifier(name) {
            return Err(ShapeIdError::InvalidName {
                id: s.to_string(),
                name: name.to_string(),
            });
        }

        let member = match member {
            Some(m) if !is_identifier(m) => {
                return Err(ShapeIdError::InvalidMember {
                    id: s.to_string(),
                    member: m.to_string(),
                });
            }
            Some(m) => Some(m.to_string()),
            None => None,
        };

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            member,
        })
    }
}

fn validate_namespace(namespace: &str, id: &str) -> Result<(), ShapeIdError> {
    if namespace.is_empty() {
        return Err(ShapeIdError::InvalidNamespace {
            id: id.to_string(),
            segment: String::new(),
        });
    }
    for segment in namespace.split('.') {
        if !is_identifier(segment) {
            return Err(ShapeIdError::InvalidNamespace {
                id: id.to_string(),
                segment: segment.to_string(),
            });
        }
    }
    Ok(())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
