//! Font resolution.

use std::path::{Path, PathBuf};

/// Font used for every language without an exception.
pub const DEFAULT_FONT: &str = "NotoSansDisplay-Regular.ttf";

/// Subchart column value that swaps the default font and disables subcharts.
pub const EASTER_EGG_SUBCHART: &str = "order66";

/// Default font forced by [`EASTER_EGG_SUBCHART`].
pub const EASTER_EGG_FONT: &str = "DeathStar.otf";

/// Languages the default font cannot render, sorted by code.
///
/// `language_column` covers the multilingual case where one chart mixes
/// several scripts.
#[rustfmt::skip]
pub const FONT_EXCEPTIONS: &[(&str, &str)] = &[
    ("ar", "NotoSansArabic-Regular.ttf"),
    ("bn", "NotoSansBengali-Regular.ttf"),
    ("fa", "NotoSansArabic-Regular.ttf"),
    ("he", "NotoSansHebrew-Regular.ttf"),
    ("hi", "NotoSansDevanagari-Regular.ttf"),
    ("hy", "NotoSansArmenian-Regular.ttf"),
    ("kn", "NotoSansKannada-Regular.ttf"),
    ("language_column", "Arial Unicode.ttf"),
    ("mr", "NotoSansDevanagari-Regular.ttf"),
    ("ta", "NotoSansTamil-Regular.ttf"),
    ("ur", "NotoSansArabic-Regular.ttf"),
    ("zh", "NotoSansCJKsc-Regular.otf"),
];

/// Looks up the exception font for `language`.
pub fn font_exception(language: &str) -> Option<&'static str> {
    FONT_EXCEPTIONS
        .binary_search_by(|(code, _)| (*code).cmp(language))
        .ok()
        .map(|i| FONT_EXCEPTIONS[i].1)
}

/// Maps a language to a font file inside a font directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontResolver {
    font_dir: PathBuf,
    default_font: String,
}

impl FontResolver {
    /// Creates a resolver falling back to `default_font` inside `font_dir`.
    pub fn new(font_dir: impl Into<PathBuf>, default_font: impl Into<String>) -> Self {
        Self {
            font_dir: font_dir.into(),
            default_font: default_font.into(),
        }
    }

    /// Directory fonts are resolved against.
    pub fn font_dir(&self) -> &Path {
        &self.font_dir
    }

    /// Font used when a language has no exception.
    pub fn default_font(&self) -> &str {
        &self.default_font
    }

    /// Font file name for `language`: exception table first, default second.
    pub fn resolve_font(&self, language: &str) -> &str {
        font_exception(language).unwrap_or(&self.default_font)
    }

    /// Full path of the font for `language`.
    pub fn font_path(&self, language: &str) -> PathBuf {
        self.font_dir.join(self.resolve_font(language))
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new("fonts", DEFAULT_FONT)
    }
}
