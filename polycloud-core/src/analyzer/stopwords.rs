//! Per-language stopword lists.
//!
//! Lists come from the `stop-words` crate (the stopwords-iso collection).
//! Supported languages without a list in that collection are named in
//! [`LANGUAGES_WITHOUT_STOPWORDS`]; they, and unknown codes, get an empty
//! filter rather than borrowing another language's list.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

/// Supported language codes with no stopword list, sorted.
pub const LANGUAGES_WITHOUT_STOPWORDS: &[&str] =
    &["is", "kn", "lb", "si", "sq", "sr", "ta", "te", "tt", "xx"];

/// Lowercased stopword set for one language.
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    stopwords: FxHashSet<String>,
}

impl StopwordFilter {
    /// Loads the stopword list for `language`.
    pub fn new(language: &str) -> Self {
        Self {
            stopwords: load_stopwords(language),
        }
    }

    /// Creates a filter that matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a filter from a custom list.
    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Case-insensitive membership test.
    pub fn is_stopword(&self, word: &str) -> bool {
        if self.stopwords.contains(word) {
            return true;
        }
        // Most tokens are already lowercase; only allocate when they aren't.
        word.chars().any(char::is_uppercase) && self.stopwords.contains(&word.to_lowercase())
    }

    /// Number of stopwords in the filter.
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Returns `true` if the filter has no stopwords.
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}

fn load_stopwords(language: &str) -> FxHashSet<String> {
    let Some(lang) = stopword_language(language) else {
        return FxHashSet::default();
    };
    get(lang).iter().map(|s| s.to_lowercase()).collect()
}

fn stopword_language(code: &str) -> Option<LANGUAGE> {
    let lang = match code {
        "af" => LANGUAGE::Afrikaans,
        "ar" => LANGUAGE::Arabic,
        "bg" => LANGUAGE::Bulgarian,
        "bn" => LANGUAGE::Bengali,
        "ca" => LANGUAGE::Catalan,
        "cs" => LANGUAGE::Czech,
        "da" => LANGUAGE::Danish,
        "de" => LANGUAGE::German,
        "el" => LANGUAGE::Greek,
        "en" => LANGUAGE::English,
        "es" => LANGUAGE::Spanish,
        "et" => LANGUAGE::Estonian,
        "eu" => LANGUAGE::Basque,
        "fa" => LANGUAGE::Persian,
        "fi" => LANGUAGE::Finnish,
        "fr" => LANGUAGE::French,
        "ga" => LANGUAGE::Irish,
        "he" => LANGUAGE::Hebrew,
        "hi" => LANGUAGE::Hindi,
        "hr" => LANGUAGE::Croatian,
        "hu" => LANGUAGE::Hungarian,
        "hy" => LANGUAGE::Armenian,
        "id" => LANGUAGE::Indonesian,
        "it" => LANGUAGE::Italian,
        "ja" => LANGUAGE::Japanese,
        "ko" => LANGUAGE::Korean,
        "lt" => LANGUAGE::Lithuanian,
        "lv" => LANGUAGE::Latvian,
        "mr" => LANGUAGE::Marathi,
        "nb" => LANGUAGE::Norwegian,
        "nl" => LANGUAGE::Dutch,
        "pl" => LANGUAGE::Polish,
        "pt" => LANGUAGE::Portuguese,
        "ro" => LANGUAGE::Romanian,
        "ru" => LANGUAGE::Russian,
        "sk" => LANGUAGE::Slovak,
        "sl" => LANGUAGE::Slovenian,
        "sv" => LANGUAGE::Swedish,
        "th" => LANGUAGE::Thai,
        "tl" => LANGUAGE::Tagalog,
        "tr" => LANGUAGE::Turkish,
        "uk" => LANGUAGE::Ukrainian,
        "ur" => LANGUAGE::Urdu,
        "vi" => LANGUAGE::Vietnamese,
        "yo" => LANGUAGE::Yoruba,
        "zh" => LANGUAGE::Chinese,
        _ => return None,
    };
    Some(lang)
}
