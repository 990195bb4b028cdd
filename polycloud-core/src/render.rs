//! Render Adapter
//!
//! Turning a frequency list into a picture is not this crate's business: a
//! [`Renderer`] receives the top words, a font path, a color function and an
//! optional title and returns encoded bytes. [`ManifestRenderer`] is the
//! built-in adapter; it writes a JSON description of the chart instead of
//! pixels, which a layout engine can pick up, and which is byte-stable for
//! identical inputs.

use std::path::Path;

use polycloud_types::RenderError;
use serde::Serialize;

use crate::style::{resolve_color, Palette};

/// Everything a renderer needs for one chart.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    /// Words with counts, most frequent first.
    pub words: &'a [(&'a str, u32)],
    /// Font file.
    pub font_path: &'a Path,
    /// Chart title.
    pub title: Option<&'a str>,
    /// Palette colors are drawn from.
    pub palette: &'a Palette,
}

impl<'a> RenderRequest<'a> {
    /// Color of `token`. Stable across runs.
    pub fn color_of(&self, token: &str) -> &'a str {
        resolve_color(token, self.palette)
    }
}

/// External capability turning a frequency list into image bytes.
pub trait Renderer: Sync {
    /// File extension of the produced images, without the dot.
    fn extension(&self) -> &str {
        "png"
    }

    /// Renders one chart.
    fn render(&self, request: &RenderRequest<'_>) -> Result<Vec<u8>, RenderError>;
}

/// Renders a chart as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestRenderer {
    require_fonts: bool,
}

#[derive(Serialize)]
struct Manifest<'a> {
    title: Option<&'a str>,
    font: &'a Path,
    palette: &'a str,
    words: Vec<ManifestWord<'a>>,
}

#[derive(Serialize)]
struct ManifestWord<'a> {
    text: &'a str,
    count: u32,
    color: &'a str,
}

impl ManifestRenderer {
    /// Creates a renderer that does not touch the file system.
    pub const fn new() -> Self {
        Self {
            require_fonts: false,
        }
    }

    /// Fails with `RenderError::Font` when the font file does not exist.
    pub const fn require_fonts(mut self, require: bool) -> Self {
        self.require_fonts = require;
        self
    }
}

impl Renderer for ManifestRenderer {
    fn extension(&self) -> &str {
        "json"
    }

    fn render(&self, request: &RenderRequest<'_>) -> Result<Vec<u8>, RenderError> {
        if self.require_fonts && !request.font_path.is_file() {
            return Err(RenderError::Font {
                path: request.font_path.display().to_string(),
                reason: "no such file".to_owned(),
            });
        }

        let manifest = Manifest {
            title: request.title,
            font: request.font_path,
            palette: request.palette.id(),
            words: request
                .words
                .iter()
                .map(|&(text, count)| ManifestWord {
                    text,
                    count,
                    color: request.color_of(text),
                })
                .collect(),
        };

        let mut bytes =
            serde_json::to_vec_pretty(&manifest).map_err(|e| RenderError::Backend(e.to_string()))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
