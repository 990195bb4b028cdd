//! Configuration
//!
//! [`WordcloudConfig`] is the raw option set as a user or a JSON file states
//! it. [`Settings`] is what the pipeline runs on: validated once, immutable,
//! with the grouping mode, palette and fonts already resolved.
//!
//! ```
//! use polycloud_core::config::{Settings, WordcloudConfig};
//!
//! let config = WordcloudConfig::from_json_str(
//!     r#"{"text_column": "review", "language": "language_column", "language_column": "lang"}"#,
//! )
//! .unwrap();
//! let settings = Settings::from_config(&config).unwrap();
//! assert_eq!(settings.mode.language_column(), Some("lang"));
//! assert_eq!(settings.max_words, 100);
//! ```

use std::path::PathBuf;

use log::info;
use polycloud_types::ConfigError;
use serde::{Deserialize, Serialize};

use crate::pipeline::aggregate::CountOptions;
use crate::pipeline::grouping::{GroupingMode, UnsupportedLanguagePolicy};
use crate::pipeline::runner::FailurePolicy;
use crate::style::{
    FontResolver, Palette, StyleResolver, DEFAULT_FONT, EASTER_EGG_FONT, EASTER_EGG_SUBCHART,
};

/// Value of `language` meaning "read the language from `language_column`".
pub const LANGUAGE_COLUMN: &str = "language_column";

/// Default number of words handed to the renderer per chart.
pub const DEFAULT_MAX_WORDS: usize = 100;

/// Raw pipeline options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordcloudConfig {
    /// Column holding the text.
    pub text_column: String,
    /// ISO 639-1 code, or [`LANGUAGE_COLUMN`].
    pub language: String,
    /// Column holding per-row language codes.
    pub language_column: Option<String>,
    /// Column splitting the output into several charts.
    pub subchart_column: Option<String>,
    /// Drop stopwords.
    pub remove_stopwords: bool,
    /// Drop punctuation.
    pub remove_punctuation: bool,
    /// Merge casing variants.
    pub case_insensitive: bool,
    /// Words per chart.
    pub max_words: usize,
    /// Built-in palette id, or `"custom"`.
    pub color_palette: Option<String>,
    /// Colors of the custom palette.
    pub color_list: Vec<String>,
    /// Default font file name.
    pub font: String,
    /// Directory holding the font files.
    pub font_dir: PathBuf,
    /// Handling of unsupported languages when subcharting by language.
    pub unsupported_languages: UnsupportedLanguagePolicy,
    /// Handling of per-group tokenization failures.
    pub on_group_error: FailurePolicy,
}

impl Default for WordcloudConfig {
    fn default() -> Self {
        Self {
            text_column: String::new(),
            language: "en".to_owned(),
            language_column: None,
            subchart_column: None,
            remove_stopwords: false,
            remove_punctuation: false,
            case_insensitive: false,
            max_words: DEFAULT_MAX_WORDS,
            color_palette: None,
            color_list: Vec::new(),
            font: DEFAULT_FONT.to_owned(),
            font_dir: PathBuf::from("fonts"),
            unsupported_languages: UnsupportedLanguagePolicy::default(),
            on_group_error: FailurePolicy::default(),
        }
    }
}

impl WordcloudConfig {
    /// Creates a config reading text from `text_column`, other options default.
    pub fn new(text_column: impl Into<String>) -> Self {
        Self {
            text_column: text_column.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON object. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Resolved, immutable settings of one run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Column holding the text.
    pub text_column: String,
    /// Configured language, possibly [`LANGUAGE_COLUMN`]. Used for font
    /// lookup when subcharts are not languages.
    pub language: String,
    /// How rows are grouped.
    pub mode: GroupingMode,
    /// Token filtering.
    pub count: CountOptions,
    /// Words per chart.
    pub max_words: usize,
    /// Fonts and colors.
    pub style: StyleResolver,
    /// Handling of unsupported languages.
    pub unsupported_languages: UnsupportedLanguagePolicy,
    /// Handling of tokenization failures.
    pub on_group_error: FailurePolicy,
}

impl Settings {
    /// Validates `config` and resolves it.
    ///
    /// A subchart column named `order66` switches the default font to
    /// `DeathStar.otf` and turns subcharting off.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] other than `UnknownColumn` and `UnsupportedLanguage`,
    /// which need the data and the tokenizer.
    pub fn from_config(config: &WordcloudConfig) -> Result<Self, ConfigError> {
        let text_column = config.text_column.trim();
        if text_column.is_empty() {
            return Err(ConfigError::MissingTextColumn);
        }

        let language = config.language.trim();
        if language.is_empty() {
            return Err(ConfigError::EmptyLanguage);
        }

        if config.max_words == 0 {
            return Err(ConfigError::ZeroMaxWords);
        }

        let mut default_font = config.font.as_str();
        let mut subchart_column = config
            .subchart_column
            .as_deref()
            .filter(|c| !c.trim().is_empty());
        if subchart_column == Some(EASTER_EGG_SUBCHART) {
            info!("Executing order 66");
            default_font = EASTER_EGG_FONT;
            subchart_column = None;
        }

        let language_column = if language == LANGUAGE_COLUMN {
            match config.language_column.as_deref() {
                None => return Err(ConfigError::MissingLanguageColumn),
                Some(c) if c.trim().is_empty() => {
                    return Err(ConfigError::EmptyColumnName {
                        option: "language_column",
                    })
                }
                Some(c) => Some(c),
            }
        } else {
            None
        };

        let mode = match (language_column, subchart_column) {
            (None, None) => GroupingMode::None {
                language: language.to_owned(),
            },
            (Some(language_column), None) => GroupingMode::LanguageOnly {
                language_column: language_column.to_owned(),
            },
            (None, Some(subchart_column)) => GroupingMode::SubchartOnly {
                language: language.to_owned(),
                subchart_column: subchart_column.to_owned(),
            },
            (Some(language_column), Some(subchart_column)) => GroupingMode::Both {
                language_column: language_column.to_owned(),
                subchart_column: subchart_column.to_owned(),
            },
        };

        let palette = Palette::resolve(config.color_palette.as_deref(), &config.color_list)?;
        let fonts = FontResolver::new(&config.font_dir, default_font);

        Ok(Self {
            text_column: text_column.to_owned(),
            language: language.to_owned(),
            mode,
            count: CountOptions {
                remove_stopwords: config.remove_stopwords,
                remove_punctuation: config.remove_punctuation,
                case_insensitive: config.case_insensitive,
            },
            max_words: config.max_words,
            style: StyleResolver::new(fonts, palette),
            unsupported_languages: config.unsupported_languages,
            on_group_error: config.on_group_error,
        })
    }
}
