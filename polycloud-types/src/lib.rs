//! Core types and errors for the polycloud pipeline.
//!
//! This crate provides the vocabulary shared between the pipeline and its
//! collaborators (tokenizer adapters, render adapters, row sources). Keeping
//! types separate ensures:
//!
//! - **Adapter independence**: a tokenizer or renderer only depends on this crate
//! - **Inspectable failures**: every error is a typed enum a caller can match on
//! - **Clean boundaries**: no circular dependencies between crates

#![warn(missing_docs)]

use core::fmt;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use thiserror::Error;

/// A single token produced by a tokenizer adapter.
///
/// Tokens are ephemeral: they live between tokenization and aggregation and
/// are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface text as it appeared in the input.
    pub text: String,
    /// Whether the tokenizer classified this token as a stopword.
    pub is_stopword: bool,
    /// Whether the token is punctuation.
    pub is_punctuation: bool,
    /// Whether the token is whitespace only.
    pub is_whitespace: bool,
}

impl Token {
    /// Creates a plain word token with every classification flag cleared.
    pub fn word(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_stopword: false,
            is_punctuation: false,
            is_whitespace: false,
        }
    }

    /// Creates a stopword token.
    pub fn stopword(text: impl Into<String>) -> Self {
        Self {
            is_stopword: true,
            ..Self::word(text)
        }
    }

    /// Creates a punctuation token.
    pub fn punctuation(text: impl Into<String>) -> Self {
        Self {
            is_punctuation: true,
            ..Self::word(text)
        }
    }

    /// Creates a whitespace token.
    pub fn whitespace(text: impl Into<String>) -> Self {
        Self {
            is_whitespace: true,
            ..Self::word(text)
        }
    }
}

/// Named-field access to one input record.
///
/// The pipeline never assumes a storage format: anything that can answer
/// "what is the value of column X" can be grouped. A missing column and a
/// null value are both reported as `None`.
pub trait Record {
    /// Returns the value of `column`, or `None` when absent or null.
    fn get(&self, column: &str) -> Option<&str>;

    /// Returns `true` if the record carries `column` at all, even as null.
    fn has_column(&self, column: &str) -> bool {
        self.get(column).is_some()
    }
}

impl<S: BuildHasher> Record for HashMap<String, String, S> {
    fn get(&self, column: &str) -> Option<&str> {
        HashMap::get(self, column).map(String::as_str)
    }

    fn has_column(&self, column: &str) -> bool {
        self.contains_key(column)
    }
}

impl Record for BTreeMap<String, String> {
    fn get(&self, column: &str) -> Option<&str> {
        BTreeMap::get(self, column).map(String::as_str)
    }

    fn has_column(&self, column: &str) -> bool {
        self.contains_key(column)
    }
}

impl<S: BuildHasher> Record for HashMap<String, Option<String>, S> {
    fn get(&self, column: &str) -> Option<&str> {
        HashMap::get(self, column).and_then(|v| v.as_deref())
    }

    fn has_column(&self, column: &str) -> bool {
        self.contains_key(column)
    }
}

impl Record for BTreeMap<String, Option<String>> {
    fn get(&self, column: &str) -> Option<&str> {
        BTreeMap::get(self, column).and_then(|v| v.as_deref())
    }

    fn has_column(&self, column: &str) -> bool {
        self.contains_key(column)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn get(&self, column: &str) -> Option<&str> {
        (**self).get(column)
    }

    fn has_column(&self, column: &str) -> bool {
        (**self).has_column(column)
    }
}

/// One input row, projected onto the columns the pipeline cares about.
///
/// Immutable once read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// Free text to tokenize. `None` when the text cell was null.
    pub text: Option<String>,
    /// Language code, when a language column is configured.
    pub language: Option<String>,
    /// Subchart value, when a subchart column is configured.
    pub subchart: Option<String>,
}

impl Row {
    /// Creates a row with text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Sets the language value.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the subchart value.
    pub fn with_subchart(mut self, subchart: impl Into<String>) -> Self {
        self.subchart = Some(subchart.into());
        self
    }
}

/// Identifies one group of rows: the tokenization language and, when
/// subcharting, the subchart value.
///
/// Ordering is lexicographic on `(language, subchart)`, which is the
/// deterministic iteration order of the grouping engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    /// Language the group is tokenized in.
    pub language: String,
    /// Subchart identifier, `None` when no subchart column is configured.
    pub subchart: Option<String>,
}

impl GroupKey {
    /// Creates a key without a subchart.
    pub fn language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            subchart: None,
        }
    }

    /// Creates a key with a subchart.
    pub fn with_subchart(language: impl Into<String>, subchart: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            subchart: Some(subchart.into()),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subchart {
            Some(subchart) => write!(f, "({}, {})", self.language, subchart),
            None => write!(f, "({})", self.language),
        }
    }
}

/// Invalid or inconsistent configuration. Always fatal, always raised before
/// any tokenization starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The text column name is empty.
    #[error("text column is not set")]
    MissingTextColumn,
    /// A configured column name is an empty string.
    #[error("{option} is set to an empty column name")]
    EmptyColumnName {
        /// The offending option name.
        option: &'static str,
    },
    /// `language` asks for a language column but none is configured.
    #[error("language is set to \"language_column\" but no language column is configured")]
    MissingLanguageColumn,
    /// Neither a fixed language nor a language column is configured.
    #[error("empty language selection")]
    EmptyLanguage,
    /// The fixed language is not supported by the tokenizer.
    #[error("unsupported language code: {code}")]
    UnsupportedLanguage {
        /// The configured code.
        code: String,
    },
    /// A configured grouping column is not present in any record.
    #[error("grouping column {column:?} is not present in the input")]
    UnknownColumn {
        /// The missing column name.
        column: String,
    },
    /// The color palette identifier is not a built-in palette.
    #[error("unknown color palette {id:?}")]
    UnknownPalette {
        /// The requested palette id.
        id: String,
    },
    /// The resolved color palette has no colors.
    #[error("color palette is empty")]
    EmptyPalette,
    /// `max_words` is zero.
    #[error("max_words must be at least 1")]
    ZeroMaxWords,
}

/// Failure reported by a tokenizer adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// The adapter has no model for this language.
    #[error("unsupported language code: {0}")]
    UnsupportedLanguage(String),
    /// A text blob exceeds the adapter's maximum length.
    #[error("text of {length} characters exceeds the limit of {max_length}")]
    TextTooLong {
        /// Length of the offending text, in characters.
        length: usize,
        /// Maximum accepted length, in characters.
        max_length: usize,
    },
    /// Any other adapter failure.
    #[error("tokenizer failure: {0}")]
    Backend(String),
}

/// Failure reported by a render adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The font could not be loaded.
    #[error("cannot load font {path}: {reason}")]
    Font {
        /// Font path that failed.
        path: String,
        /// Reason reported by the backend.
        reason: String,
    },
    /// Any other rendering failure.
    #[error("render failure: {0}")]
    Backend(String),
}

/// Fatal pipeline errors.
///
/// Recoverable per-group failures are not represented here; they are
/// collected alongside successful results instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Rows carry languages the tokenizer does not support while subcharting
    /// by language, and the policy is to fail.
    #[error("{rows} rows have unsupported language codes: {}", .languages.join(", "))]
    UnsupportedLanguage {
        /// Distinct unsupported codes, sorted.
        languages: Vec<String>,
        /// Number of affected rows.
        rows: usize,
    },
    /// No row survived grouping.
    #[error("no rows left to process after grouping")]
    EmptyInput,
    /// Tokenization of one group failed and the policy is to abort.
    #[error("tokenization failed for group {group}: {source}")]
    Tokenization {
        /// The group that failed.
        group: GroupKey,
        /// The adapter error.
        source: TokenizeError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_constructors_set_single_flag() {
        let t = Token::stopword("the");
        assert!(t.is_stopword && !t.is_punctuation && !t.is_whitespace);

        let t = Token::punctuation(".");
        assert!(t.is_punctuation && !t.is_stopword && !t.is_whitespace);

        let t = Token::whitespace(" ");
        assert!(t.is_whitespace && !t.is_stopword && !t.is_punctuation);

        let t = Token::word("cloud");
        assert_eq!(t.text, "cloud");
        assert!(!t.is_whitespace && !t.is_stopword && !t.is_punctuation);
    }

    #[test]
    fn group_key_ordering_is_language_then_subchart() {
        let mut keys = vec![
            GroupKey::with_subchart("fr", "a"),
            GroupKey::with_subchart("en", "b"),
            GroupKey::with_subchart("en", "a"),
        ];
        keys.sort();
        assert_eq!(keys[0], GroupKey::with_subchart("en", "a"));
        assert_eq!(keys[1], GroupKey::with_subchart("en", "b"));
        assert_eq!(keys[2], GroupKey::with_subchart("fr", "a"));
    }

    #[test]
    fn group_key_display() {
        assert_eq!(GroupKey::language("en").to_string(), "(en)");
        assert_eq!(GroupKey::with_subchart("en", "news").to_string(), "(en, news)");
    }

    #[test]
    fn record_treats_null_as_missing() {
        let mut map: BTreeMap<String, Option<String>> = BTreeMap::new();
        map.insert("text".into(), Some("hello".into()));
        map.insert("lang".into(), None);

        assert_eq!(Record::get(&map, "text"), Some("hello"));
        assert_eq!(Record::get(&map, "lang"), None);
        assert_eq!(Record::get(&map, "absent"), None);
        assert!(map.has_column("lang"));
        assert!(!map.has_column("absent"));
    }

    #[test]
    fn unsupported_language_message_names_row_count() {
        let err = PipelineError::UnsupportedLanguage {
            languages: vec!["tlh".into(), "xx".into()],
            rows: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains('4'));
        assert!(msg.contains("tlh, xx"));
    }

    #[test]
    fn unsupported_fixed_language_message_names_code() {
        let err = ConfigError::UnsupportedLanguage { code: "tlh".into() };
        assert_eq!(err.to_string(), "unsupported language code: tlh");
    }

    #[test]
    fn tokenization_error_names_group() {
        let err = PipelineError::Tokenization {
            group: GroupKey::with_subchart("en", "reviews"),
            source: TokenizeError::Backend("boom".into()),
        };
        assert!(err.to_string().contains("(en, reviews)"));
    }
}
