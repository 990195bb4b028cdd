//! Tokenizer Adapter
//!
//! The pipeline never splits text itself. It hands each group's texts to a
//! [`Tokenizer`] together with the group's language and receives one token
//! sequence per text, each token carrying its surface form and three
//! classification flags (stopword, punctuation, whitespace).
//!
//! ## The Contract
//!
//! - The output has exactly one `Vec<Token>` per input text, in input order.
//! - Every whitespace-only token is flagged `is_whitespace`.
//! - Implementations are shared across worker threads, hence `Sync`.
//!
//! ## Built-in Adapter
//!
//! [`UnicodeTokenizer`] segments on Unicode word boundaries (UAX #29), so it
//! keeps `d'automne` whole, splits `#OMG` into `#` and `OMG`, and emits CJK
//! ideographs one by one. Stopwords come from [`StopwordFilter`].
//!
//! ```
//! use polycloud_core::analyzer::tokenizer::{Tokenizer, UnicodeTokenizer};
//!
//! let tokenizer = UnicodeTokenizer::new();
//! let docs = tokenizer.tokenize(&["I fear nothing."], "en").unwrap();
//! let words: Vec<&str> = docs[0].iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(words, ["I", " ", "fear", " ", "nothing", "."]);
//! ```

use polycloud_types::{Token, TokenizeError};
use unicode_segmentation::UnicodeSegmentation;

use crate::analyzer::languages;
use crate::analyzer::stopwords::StopwordFilter;

/// External NLP capability converting raw text into classified tokens.
pub trait Tokenizer: Sync {
    /// Returns `true` if `language` can be tokenized.
    fn supports(&self, language: &str) -> bool;

    /// Tokenizes each text in `language`, returning one sequence per text.
    fn tokenize(&self, texts: &[&str], language: &str) -> Result<Vec<Vec<Token>>, TokenizeError>;
}

/// Word-boundary tokenizer backed by `unicode-segmentation`.
#[derive(Debug, Clone, Default)]
pub struct UnicodeTokenizer {
    max_chars: Option<usize>,
}

impl UnicodeTokenizer {
    /// Creates a tokenizer with no text length limit.
    pub const fn new() -> Self {
        Self { max_chars: None }
    }

    /// Rejects any single text longer than `max_chars` characters.
    pub const fn with_max_chars(max_chars: usize) -> Self {
        Self {
            max_chars: Some(max_chars),
        }
    }

    fn check_length(&self, text: &str) -> Result<(), TokenizeError> {
        let Some(max_length) = self.max_chars else {
            return Ok(());
        };
        let length = text.chars().count();
        if length > max_length {
            return Err(TokenizeError::TextTooLong { length, max_length });
        }
        Ok(())
    }

    fn classify(segment: &str, stopwords: &StopwordFilter) -> Token {
        if segment.chars().all(char::is_whitespace) {
            Token::whitespace(segment)
        } else if segment.chars().all(is_punctuation) {
            Token::punctuation(segment)
        } else if stopwords.is_stopword(segment) {
            Token::stopword(segment)
        } else {
            Token::word(segment)
        }
    }
}

impl Tokenizer for UnicodeTokenizer {
    fn supports(&self, language: &str) -> bool {
        languages::is_supported(language)
    }

    fn tokenize(&self, texts: &[&str], language: &str) -> Result<Vec<Vec<Token>>, TokenizeError> {
        if !self.supports(language) {
            return Err(TokenizeError::UnsupportedLanguage(language.to_owned()));
        }
        for text in texts {
            self.check_length(text)?;
        }

        let stopwords = StopwordFilter::new(language);
        Ok(texts
            .iter()
            .map(|text| {
                text.split_word_bounds()
                    .map(|segment| Self::classify(segment, &stopwords))
                    .collect()
            })
            .collect())
    }
}

/// Unicode punctuation test covering ASCII, Latin-1, General Punctuation,
/// CJK Symbols and Punctuation, and the fullwidth forms.
pub fn is_punctuation(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_punctuation();
    }
    matches!(
        c as u32,
        0x00A1 | 0x00A7 | 0x00AB | 0x00B6 | 0x00B7 | 0x00BB | 0x00BF
            | 0x037E
            | 0x0387
            | 0x055A..=0x055F
            | 0x0589
            | 0x05BE
            | 0x05C0
            | 0x05C3
            | 0x05F3..=0x05F4
            | 0x060C..=0x060D
            | 0x061B
            | 0x061F
            | 0x066A..=0x066D
            | 0x06D4
            | 0x0964..=0x0965
            | 0x2010..=0x2027
            | 0x2030..=0x205E
            | 0x3001..=0x3003
            | 0x3008..=0x3011
            | 0x3014..=0x301F
            | 0x30FB
            | 0xFE10..=0xFE19
            | 0xFE30..=0xFE4F
            | 0xFF01..=0xFF03
            | 0xFF05..=0xFF0A
            | 0xFF0C..=0xFF0F
            | 0xFF1A..=0xFF1B
            | 0xFF1F..=0xFF20
            | 0xFF3B..=0xFF3D
            | 0xFF3F
            | 0xFF5B
            | 0xFF5D
            | 0xFF5F..=0xFF65
    )
}
