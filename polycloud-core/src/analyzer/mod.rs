//! Text analysis components.
//!
//! This module provides everything between raw text and counted tokens:
//! - **Tokenizer**: the adapter trait and a built-in Unicode implementation
//! - **Stopwords**: per-language stopword lists used for token classification
//! - **Languages**: the supported-languages table
//! - **Normalizer**: case folding of frequency maps

pub mod languages;
pub mod normalizer;
pub mod stopwords;
pub mod tokenizer;

pub use normalizer::fold_case;
pub use stopwords::StopwordFilter;
pub use tokenizer::{Tokenizer, UnicodeTokenizer};
