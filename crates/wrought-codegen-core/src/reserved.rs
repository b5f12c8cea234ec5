//! Reserved-word detection and escaping for generated code.
//!
//! Target languages reserve identifiers the model is free to use, so symbol
//! names pass through a [`ReservedWords`] implementation before they reach
//! generated output.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::CodegenError;

/// Detects reserved words and converts them into safe alternatives.
pub trait ReservedWords {
    /// Whether `word` is reserved.
    fn is_reserved(&self, word: &str) -> bool;

    /// The safe replacement for `word`; unreserved words come back
    /// unchanged.
    fn escape(&self, word: &str) -> String;
}

/// Reserved words that map known words to explicit replacements.
///
/// Detection has a case-sensitive tier and a case-insensitive tier; the
/// case-sensitive tier wins when both match.
///
/// ```
/// use wrought_codegen_core::reserved::{MappedReservedWords, ReservedWords};
///
/// let reserved = MappedReservedWords::builder()
///     .put("type", "type_")
///     .put_case_insensitive("self", "self_")
///     .build();
/// assert_eq!(reserved.escape("type"), "type_");
/// assert_eq!(reserved.escape("Type"), "Type");
/// assert_eq!(reserved.escape("SELF"), "self_");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MappedReservedWords {
    mappings: BTreeMap<String, String>,
    case_insensitive_mappings: BTreeMap<String, String>,
}

impl MappedReservedWords {
    pub fn builder() -> MappedReservedWordsBuilder {
        MappedReservedWordsBuilder::default()
    }
}

impl ReservedWords for MappedReservedWords {
    fn is_reserved(&self, word: &str) -> bool {
        self.mappings.contains_key(word)
            || self
                .case_insensitive_mappings
                .contains_key(&word.to_lowercase())
    }

    fn escape(&self, word: &str) -> String {
        if let Some(replacement) = self.mappings.get(word) {
            return replacement.clone();
        }
        if let Some(replacement) = self.case_insensitive_mappings.get(&word.to_lowercase()) {
            return replacement.clone();
        }
        word.to_string()
    }
}

/// Builder for [`MappedReservedWords`].
#[derive(Debug, Default)]
pub struct MappedReservedWordsBuilder {
    mappings: BTreeMap<String, String>,
    case_insensitive_mappings: BTreeMap<String, String>,
}

impl MappedReservedWordsBuilder {
    /// Map a reserved word to its replacement, matched exactly.
    pub fn put(mut self, word: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.mappings.insert(word.into(), replacement.into());
        self
    }

    /// Map a reserved word to its replacement, matched case-insensitively.
    pub fn put_case_insensitive(
        mut self,
        word: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.case_insensitive_mappings
            .insert(word.into().to_lowercase(), replacement.into());
        self
    }

    pub fn build(self) -> MappedReservedWords {
        MappedReservedWords {
            mappings: self.mappings,
            case_insensitive_mappings: self.case_insensitive_mappings,
        }
    }
}

/// How [`ReservedWordsBuilder`] rewrites a reserved word.
#[derive(Debug, Clone)]
enum EscapeStrategy {
    Suffix(String),
    Prefix(String),
}

impl Default for EscapeStrategy {
    fn default() -> Self {
        EscapeStrategy::Suffix("_".to_string())
    }
}

/// Builds a [`ReservedWords`] from word lists.
///
/// Word lists hold one word per line; blank lines and `#` comments are
/// ignored. Every listed word escapes by appending a suffix (default `_`)
/// or prepending a prefix.
#[derive(Debug, Default)]
pub struct ReservedWordsBuilder {
    words: BTreeSet<String>,
    strategy: EscapeStrategy,
}

impl ReservedWordsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve one word.
    pub fn word(mut self, word: impl Into<String>) -> Self {
        self.words.insert(word.into());
        self
    }

    /// Reserve every word in a word-list string.
    pub fn load_words_from_str(mut self, text: &str) -> Self {
        for line in text.lines() {
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            self.words.insert(word.to_string());
        }
        self
    }

    /// Reserve every word in a word-list file.
    pub fn load_words(self, path: &Path) -> Result<Self, CodegenError> {
        let text = std::fs::read_to_string(path).map_err(|source| CodegenError::WordList {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.load_words_from_str(&text))
    }

    /// Escape reserved words by appending `suffix`.
    pub fn escape_with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.strategy = EscapeStrategy::Suffix(suffix.into());
        self
    }

    /// Escape reserved words by prepending `prefix`.
    pub fn escape_with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.strategy = EscapeStrategy::Prefix(prefix.into());
        self
    }

    /// Materialize the word list into a [`MappedReservedWords`].
    pub fn build(self) -> MappedReservedWords {
        let Self { words, strategy } = self;
        let mut builder = MappedReservedWords::builder();
        for word in words {
            let replacement = match &strategy {
                EscapeStrategy::Suffix(suffix) => format!("{word}{suffix}"),
                EscapeStrategy::Prefix(prefix) => format!("{prefix}{word}"),
            };
            builder = builder.put(word, replacement);
        }
        builder.build()
    }
}
