//! Color palettes and deterministic color assignment.
//!
//! A token's color is a pure function of its text and the palette: the
//! SHA-256 digest of the text, reduced modulo the palette size. The same
//! token is therefore painted the same color in every run, every subchart
//! and every process.

use polycloud_types::ConfigError;
use sha2::{Digest as _, Sha256};

/// Palette id selecting `color_list` instead of a built-in palette.
pub const CUSTOM_PALETTE: &str = "custom";

/// Palette used when nothing is configured.
pub const DEFAULT_PALETTE: &str = "classic";

/// A named, non-empty list of CSS color strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    id: String,
    colors: Vec<String>,
}

/// A palette shipped with the crate.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinPalette {
    /// Identifier used in configuration.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Colors, in order.
    pub colors: &'static [&'static str],
}

/// Palettes selectable by id, `classic` first.
#[rustfmt::skip]
pub const BUILTIN_PALETTES: &[BuiltinPalette] = &[
    BuiltinPalette {
        id: "classic",
        name: "Classic",
        colors: &["hsl(205,71%,41%)", "hsl(214,56%,80%)", "hsl(28,100%,53%)", "hsl(30,100%,74%)", "hsl(120,57%,40%)", "hsl(110,57%,71%)"],
    },
    BuiltinPalette {
        id: "default",
        name: "Default",
        colors: &["#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B", "#E377C2", "#7F7F7F"],
    },
    BuiltinPalette {
        id: "next",
        name: "Next",
        colors: &["#00AEDB", "#8CC63F", "#FFC425", "#F37735", "#D11141", "#91268F", "#194BA3", "#00B159"],
    },
    BuiltinPalette {
        id: "pastel",
        name: "Pastel",
        colors: &["#EC6547", "#FDC665", "#95C37B", "#75C2CC", "#694A82", "#538BC8", "#65B890", "#A874A0"],
    },
    BuiltinPalette {
        id: "corporate",
        name: "Corporate",
        colors: &["#0075B2", "#818991", "#EA9423", "#A4C2DB", "#EF3C39", "#009D4B", "#CFD6D3", "#231F20"],
    },
    BuiltinPalette {
        id: "deuteranopia",
        name: "Deuteranopia",
        colors: &["#193C81", "#7EA0F9", "#211924", "#757A8D", "#D6C222", "#776A37", "#AE963A", "#655E5D"],
    },
    BuiltinPalette {
        id: "tritanopia",
        name: "Tritanopia",
        colors: &["#CA0849", "#0B4D61", "#E4B2BF", "#3F6279", "#F24576", "#7D8E98", "#9C4259", "#2B2A2E"],
    },
    BuiltinPalette {
        id: "pastel2",
        name: "Pastel 2",
        colors: &["#F06548", "#FDC766", "#7BC9A6", "#4EC5DA", "#548ECB", "#97668F", "#5E2974"],
    },
];

impl Palette {
    /// Looks up a built-in palette by id.
    pub fn builtin(id: &str) -> Option<Self> {
        BUILTIN_PALETTES.iter().find(|p| p.id == id).map(|p| Self {
            id: p.id.to_owned(),
            colors: p.colors.iter().map(|c| (*c).to_owned()).collect(),
        })
    }

    /// Builds a custom palette. Blank entries are discarded.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyPalette` if no color remains.
    pub fn custom<S: AsRef<str>>(colors: &[S]) -> Result<Self, ConfigError> {
        let colors: Vec<String> = colors
            .iter()
            .map(|c| c.as_ref().trim())
            .filter(|c| !c.is_empty())
            .map(str::to_owned)
            .collect();
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self {
            id: CUSTOM_PALETTE.to_owned(),
            colors,
        })
    }

    /// Resolves the `color_palette` / `color_list` options.
    ///
    /// - `"custom"` uses `color_list`
    /// - any other id must name a built-in palette
    /// - no id uses `color_list` when given, the classic palette otherwise
    pub fn resolve<S: AsRef<str>>(id: Option<&str>, color_list: &[S]) -> Result<Self, ConfigError> {
        match id {
            Some(CUSTOM_PALETTE) => Self::custom(color_list),
            Some(id) => Self::builtin(id).ok_or_else(|| ConfigError::UnknownPalette {
                id: id.to_owned(),
            }),
            None if !color_list.is_empty() => Self::custom(color_list),
            None => Self::builtin(DEFAULT_PALETTE).ok_or(ConfigError::EmptyPalette),
        }
    }

    /// Palette identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Palette colors.
    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            id: DEFAULT_PALETTE.to_owned(),
            colors: BUILTIN_PALETTES[0].colors.iter().map(|c| (*c).to_owned()).collect(),
        }
    }
}

/// Stable 64-bit hash of a token: the first eight bytes of its SHA-256.
pub fn stable_hash(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head)
}

/// Picks the palette color for `token`.
pub fn resolve_color<'p>(token: &str, palette: &'p Palette) -> &'p str {
    // Palettes are never empty, see `Palette::custom`.
    let index = (stable_hash(token) % palette.colors.len() as u64) as usize;
    &palette.colors[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ids_are_unique_and_non_empty() {
        for (i, p) in BUILTIN_PALETTES.iter().enumerate() {
            assert!(!p.colors.is_empty(), "{} is empty", p.id);
            assert!(BUILTIN_PALETTES[i + 1..].iter().all(|q| q.id != p.id));
        }
    }

    #[test]
    fn default_is_classic() {
        assert_eq!(Palette::default(), Palette::builtin("classic").expect("builtin"));
    }

    #[test]
    fn resolve_rules() {
        let none: [&str; 0] = [];
        assert_eq!(Palette::resolve(None, &none).expect("default").id(), "classic");
        assert_eq!(Palette::resolve(Some("pastel"), &none).expect("builtin").id(), "pastel");

        let custom = Palette::resolve(Some("custom"), &["#000", " ", "#fff"]).expect("custom");
        assert_eq!(custom.colors(), ["#000", "#fff"]);

        let implicit = Palette::resolve(None, &["red"]).expect("implicit custom");
        assert_eq!(implicit.id(), "custom");
    }

    #[test]
    fn resolve_errors() {
        let none: [&str; 0] = [];
        assert_eq!(
            Palette::resolve(Some("neon"), &none),
            Err(ConfigError::UnknownPalette { id: "neon".into() })
        );
        assert_eq!(Palette::resolve(Some("custom"), &none), Err(ConfigError::EmptyPalette));
        assert_eq!(Palette::custom(&["", "  "]), Err(ConfigError::EmptyPalette));
    }

    #[test]
    fn stable_hash_is_fixed() {
        // sha256("") = e3b0c44298fc1c14...
        assert_eq!(stable_hash(""), 0xe3b0_c442_98fc_1c14);
        assert_eq!(stable_hash("cloud"), stable_hash("cloud"));
        assert_ne!(stable_hash("cloud"), stable_hash("Cloud"));
    }

    #[test]
    fn color_is_deterministic() {
        let palette = Palette::default();
        for word in ["the", "cloud", "子", "💩", ""] {
            assert_eq!(resolve_color(word, &palette), resolve_color(word, &palette));
            assert!(palette.colors().iter().any(|c| c == resolve_color(word, &palette)));
        }
    }

    #[test]
    fn colors_spread_over_palette() {
        let palette = Palette::builtin("default").expect("builtin");
        let mut seen = std::collections::HashSet::new();
        for i in 0..200 {
            seen.insert(resolve_color(&format!("word{i}"), &palette));
        }
        assert_eq!(seen.len(), palette.colors().len());
    }

    #[test]
    fn single_color_palette() {
        let palette = Palette::custom(&["black"]).expect("custom");
        assert_eq!(resolve_color("anything", &palette), "black");
    }
}
