//! The built-in trait registry.
//!
//! Traits are named values attached to shapes and members. The registry
//! records which traits are known and what value kind each accepts; the
//! assembler uses it to flag unknown traits and malformed trait values.

use std::collections::BTreeMap;

use crate::node::{Node, NodeKind};

/// The accepted value shape for a trait.
#[derive(Debug, Clone)]
pub struct TraitSpec {
    kinds: Vec<NodeKind>,
    /// For array-valued traits, the required element kind.
    element_kind: Option<NodeKind>,
    /// For string-valued traits, the allowed values.
    allowed_values: Option<Vec<String>>,
}

impl TraitSpec {
    /// A trait accepting one value kind.
    pub fn of_kind(kind: NodeKind) -> Self {
        Self {
            kinds: vec![kind],
            element_kind: None,
            allowed_values: None,
        }
    }

    /// An annotation trait: applied with a null or boolean value.
    pub fn annotation() -> Self {
        Self {
            kinds: vec![NodeKind::Null, NodeKind::Boolean],
            element_kind: None,
            allowed_values: None,
        }
    }

    /// An array trait whose elements must all be of `element_kind`.
    pub fn array_of(element_kind: NodeKind) -> Self {
        Self {
            kinds: vec![NodeKind::Array],
            element_kind: Some(element_kind),
            allowed_values: None,
        }
    }

    /// A string trait restricted to a fixed set of values.
    pub fn string_enum(values: &[&str]) -> Self {
        Self {
            kinds: vec![NodeKind::String],
            element_kind: None,
            allowed_values: Some(values.iter().map(|v| (*v).to_string()).collect()),
        }
    }

    /// Human-readable description of what this spec accepts, for
    /// diagnostics.
    pub fn expected(&self) -> String {
        let kinds = self
            .kinds
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        match (&self.element_kind, &self.allowed_values) {
            (Some(element), _) => format!("{kinds} of {element} values"),
            (_, Some(values)) => format!("{kinds} (one of: {})", values.join(", ")),
            _ => kinds,
        }
    }

    fn accepts(&self, value: &Node) -> bool {
        if !self.kinds.contains(&value.kind()) {
            return false;
        }
        if let (Some(element_kind), Some(elements)) = (self.element_kind, value.as_array()) {
            if elements.iter().any(|e| e.kind() != element_kind) {
                return false;
            }
        }
        if let (Some(allowed), Some(s)) = (&self.allowed_values, value.as_str()) {
            if !allowed.iter().any(|v| v == s) {
                return false;
            }
        }
        true
    }
}

/// Result of checking a trait application against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraitCheck {
    /// Known trait, acceptable value.
    Ok,
    /// The trait is not in the registry.
    Unknown,
    /// Known trait, unacceptable value.
    InvalidValue { expected: String },
}

/// A table of known traits.
#[derive(Debug, Clone)]
pub struct TraitRegistry {
    specs: BTreeMap<String, TraitSpec>,
}

impl Default for TraitRegistry {
    fn default() -> Self {
        Self::prelude()
    }
}

impl TraitRegistry {
    /// A registry with no known traits.
    pub fn empty() -> Self {
        Self {
            specs: BTreeMap::new(),
        }
    }

    /// The built-in trait table.
    pub fn prelude() -> Self {
        let mut registry = Self::empty();
        registry.register("documentation", TraitSpec::of_kind(NodeKind::String));
        registry.register("title", TraitSpec::of_kind(NodeKind::String));
        registry.register("required", TraitSpec::annotation());
        registry.register("sensitive", TraitSpec::annotation());
        registry.register("retryable", TraitSpec::annotation());
        registry.register("readonly", TraitSpec::annotation());
        registry.register("idempotent", TraitSpec::annotation());
        registry.register("uniqueItems", TraitSpec::annotation());
        registry.register("deprecated", TraitSpec::of_kind(NodeKind::Object));
        registry.register("enum", TraitSpec::of_kind(NodeKind::Object));
        registry.register("length", TraitSpec::of_kind(NodeKind::Object));
        registry.register("range", TraitSpec::of_kind(NodeKind::Object));
        registry.register("paginated", TraitSpec::of_kind(NodeKind::Object));
        registry.register("pattern", TraitSpec::of_kind(NodeKind::String));
        registry.register("since", TraitSpec::of_kind(NodeKind::String));
        registry.register("mediaType", TraitSpec::of_kind(NodeKind::String));
        registry.register("tags", TraitSpec::array_of(NodeKind::String));
        registry.register("error", TraitSpec::string_enum(&["client", "server"]));
        registry.register(
            "timestampFormat",
            TraitSpec::string_enum(&["date-time", "http-date", "epoch-seconds"]),
        );
        registry
    }

    /// Add or replace a trait spec.
    pub fn register(&mut self, name: impl Into<String>, spec: TraitSpec) {
        self.specs.insert(name.into(), spec);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Check a trait application.
    pub fn check(&self, name: &str, value: &Node) -> TraitCheck {
        match self.specs.get(name) {
            None => TraitCheck::Unknown,
            Some(spec) if spec.accepts(value) => TraitCheck::Ok,
            Some(spec) => TraitCheck::InvalidValue {
                expected: spec.expected(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_trait_ok() {
        let registry = TraitRegistry::prelude();
        assert_eq!(
            registry.check("documentation", &Node::string("A city.")),
            TraitCheck::Ok
        );
    }

    #[test]
    fn test_unknown_trait() {
        let registry = TraitRegistry::prelude();
        assert_eq!(
            registry.check("example.custom#meta", &Node::null()),
            TraitCheck::Unknown
        );
    }

    #[test]
    fn test_wrong_kind() {
        let registry = TraitRegistry::prelude();
        let check = registry.check("documentation", &Node::from(3));
        assert!(matches!(check, TraitCheck::InvalidValue { .. }));
    }

    #[test]
    fn test_annotation_accepts_null_and_boolean() {
        let registry = TraitRegistry::prelude();
        assert_eq!(registry.check("required", &Node::null()), TraitCheck::Ok);
        assert_eq!(registry.check("required", &Node::from(true)), TraitCheck::Ok);
        assert!(matches!(
            registry.check("required", &Node::string("yes")),
            TraitCheck::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_tags_elements_must_be_strings() {
        let registry = TraitRegistry::prelude();
        let good = Node::array(vec![Node::string("alpha"), Node::string("beta")]);
        assert_eq!(registry.check("tags", &good), TraitCheck::Ok);

        let bad = Node::array(vec![Node::string("alpha"), Node::from(1)]);
        let check = registry.check("tags", &bad);
        match check {
            TraitCheck::InvalidValue { expected } => {
                assert!(expected.contains("array of string"));
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_error_trait_values() {
        let registry = TraitRegistry::prelude();
        assert_eq!(registry.check("error", &Node::string("client")), TraitCheck::Ok);
        assert!(matches!(
            registry.check("error", &Node::string("fatal")),
            TraitCheck::InvalidValue { .. }
        ));
    }
}
