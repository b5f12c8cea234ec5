//! Symbols: names in the target language for shapes in the model.
//!
//! A [`SymbolProvider`] is the seam between the semantic model and a
//! generator: it decides what a shape is called in generated code and which
//! file defines it. [`ReservedWordSymbolProvider`] decorates any provider
//! with reserved-word escaping.

use std::collections::BTreeMap;
use std::fmt;

use wrought_model::{MemberShape, Node, Shape};

use crate::error::CodegenError;
use crate::reserved::ReservedWords;

/// A named reference to an artifact in the target language.
///
/// Equality ignores properties; two symbols naming the same artifact are
/// the same symbol.
#[derive(Debug, Clone)]
pub struct Symbol {
    namespace: String,
    namespace_delimiter: String,
    name: String,
    definition_file: String,
    properties: BTreeMap<String, Node>,
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace
            && self.name == other.name
            && self.definition_file == other.definition_file
    }
}

impl Symbol {
    pub fn builder() -> SymbolBuilder {
        SymbolBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Relative path of the file that defines this symbol, empty when the
    /// symbol is external.
    pub fn definition_file(&self) -> &str {
        &self.definition_file
    }

    pub fn property(&self, name: &str) -> Option<&Node> {
        self.properties.get(name)
    }

    /// Namespace-qualified name, or the bare name when there is no
    /// namespace.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}{}{}", self.namespace, self.namespace_delimiter, self.name)
        }
    }

    /// A copy of this symbol under a different name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// A copy of this symbol under a different namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// Builder for [`Symbol`]; `name` is required.
#[derive(Debug, Default)]
pub struct SymbolBuilder {
    namespace: String,
    namespace_delimiter: String,
    name: Option<String>,
    definition_file: String,
    properties: BTreeMap<String, Node>,
}

impl SymbolBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn namespace(
        mut self,
        namespace: impl Into<String>,
        delimiter: impl Into<String>,
    ) -> Self {
        self.namespace = namespace.into();
        self.namespace_delimiter = delimiter.into();
        self
    }

    pub fn definition_file(mut self, path: impl Into<String>) -> Self {
        self.definition_file = path.into();
        self
    }

    pub fn property(mut self, name: impl Into<String>, value: Node) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn build(self) -> Result<Symbol, CodegenError> {
        let name = self.name.ok_or_else(|| CodegenError::IncompleteSymbol {
            property: "name".to_string(),
        })?;
        Ok(Symbol {
            namespace: self.namespace,
            namespace_delimiter: self.namespace_delimiter,
            name,
            definition_file: self.definition_file,
            properties: self.properties,
        })
    }
}

/// Maps shapes to the symbols generated code uses for them.
pub trait SymbolProvider {
    /// The symbol for a shape.
    fn to_symbol(&self, shape: &Shape) -> Symbol;

    /// The target-language name for a member. Defaults to the member name
    /// as modeled.
    fn to_member_name(&self, name: &str, _member: &MemberShape) -> String {
        name.to_string()
    }
}

/// Decorates a [`SymbolProvider`], escaping names through per-facet
/// reserved-word sets.
///
/// Facets left unset pass values through untouched.
pub struct ReservedWordSymbolProvider<P> {
    delegate: P,
    name_reserved: Option<Box<dyn ReservedWords>>,
    namespace_reserved: Option<Box<dyn ReservedWords>>,
    member_reserved: Option<Box<dyn ReservedWords>>,
}

impl<P> fmt::Debug for ReservedWordSymbolProvider<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReservedWordSymbolProvider")
            .field("name_reserved", &self.name_reserved.is_some())
            .field("namespace_reserved", &self.namespace_reserved.is_some())
            .field("member_reserved", &self.member_reserved.is_some())
            .finish_non_exhaustive()
    }
}

impl<P> ReservedWordSymbolProvider<P> {
    pub fn new(delegate: P) -> Self {
        Self {
            delegate,
            name_reserved: None,
            namespace_reserved: None,
            member_reserved: None,
        }
    }

    /// Escape symbol names through `words`.
    pub fn name_reserved_words(mut self, words: impl ReservedWords + 'static) -> Self {
        self.name_reserved = Some(Box::new(words));
        self
    }

    /// Escape symbol namespaces through `words`.
    pub fn namespace_reserved_words(mut self, words: impl ReservedWords + 'static) -> Self {
        self.namespace_reserved = Some(Box::new(words));
        self
    }

    /// Escape member names through `words`.
    pub fn member_reserved_words(mut self, words: impl ReservedWords + 'static) -> Self {
        self.member_reserved = Some(Box::new(words));
        self
    }
}

impl<P: SymbolProvider> SymbolProvider for ReservedWordSymbolProvider<P> {
    fn to_symbol(&self, shape: &Shape) -> Symbol {
        let mut symbol = self.delegate.to_symbol(shape);
        if let Some(reserved) = &self.name_reserved {
            let escaped = reserved.escape(symbol.name());
            symbol = symbol.with_name(escaped);
        }
        if let Some(reserved) = &self.namespace_reserved {
            let escaped = reserved.escape(symbol.namespace());
            symbol = symbol.with_namespace(escaped);
        }
        symbol
    }

    fn to_member_name(&self, name: &str, member: &MemberShape) -> String {
        let name = self.delegate.to_member_name(name, member);
        match &self.member_reserved {
            Some(reserved) => reserved.escape(&name),
            None => name,
        }
    }
}
