//! Output file naming.

use log::warn;
use rustc_hash::FxHashSet;

/// Stem of the single chart produced without subcharts.
pub const SINGLE_CHART_STEM: &str = "wordcloud";

/// Makes `name` safe as a file name on every platform.
///
/// Letters and digits of any script, `_`, `-` and `.` are kept; any other
/// character (path separators, whitespace, reserved punctuation, controls)
/// becomes `_`. The result is lower-cased.
pub fn sanitize_filename(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            sanitized.extend(c.to_lowercase());
        } else if matches!(c, '_' | '-' | '.') {
            sanitized.push(c);
        } else {
            sanitized.push('_');
        }
    }
    sanitized
}

/// Sanitized file stem of a chart.
///
/// `wordcloud_{column}_{subchart}` when subcharting, `wordcloud` otherwise.
pub fn chart_stem(subchart_column: Option<&str>, subchart: &str) -> String {
    match subchart_column {
        Some(column) => sanitize_filename(&format!("{SINGLE_CHART_STEM}_{column}_{subchart}")),
        None => SINGLE_CHART_STEM.to_owned(),
    }
}

/// Hands out stems that are unique within one run.
///
/// Two subcharts can sanitize to the same stem (`"a b"` and `"a/b"`); the
/// later one gets a `_1`, `_2`, ... suffix.
#[derive(Debug, Default)]
pub struct UniqueNames {
    taken: FxHashSet<String>,
}

impl UniqueNames {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `stem`, or the first free `stem_N`.
    pub fn claim(&mut self, stem: String) -> String {
        if self.taken.insert(stem.clone()) {
            return stem;
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{stem}_{n}");
            if self.taken.insert(candidate.clone()) {
                warn!("file name {stem:?} already used, renamed to {candidate:?}");
                return candidate;
            }
            n += 1;
        }
    }
}
