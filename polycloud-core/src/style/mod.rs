//! Deterministic styling: which font and which colors a chart uses.
//!
//! Both lookups are pure functions of read-only tables, so a
//! [`StyleResolver`] can be shared across render workers without locking.

pub mod fonts;
pub mod palette;

use std::path::PathBuf;

pub use fonts::{FontResolver, DEFAULT_FONT, EASTER_EGG_FONT, EASTER_EGG_SUBCHART};
pub use palette::{resolve_color, Palette};

/// Font and palette for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleResolver {
    fonts: FontResolver,
    palette: Palette,
}

impl StyleResolver {
    /// Creates a resolver from its parts.
    pub fn new(fonts: FontResolver, palette: Palette) -> Self {
        Self { fonts, palette }
    }

    /// Font file name for `language`.
    pub fn resolve_font(&self, language: &str) -> &str {
        self.fonts.resolve_font(language)
    }

    /// Font path for `language`.
    pub fn font_path(&self, language: &str) -> PathBuf {
        self.fonts.font_path(language)
    }

    /// Color of `token` in the configured palette.
    pub fn resolve_color(&self, token: &str) -> &str {
        resolve_color(token, &self.palette)
    }

    /// The font resolver.
    pub fn fonts(&self) -> &FontResolver {
        &self.fonts
    }

    /// The configured palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}
