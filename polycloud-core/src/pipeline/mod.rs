//! The word-cloud pipeline.
//!
//! ```text
//! records ─ grouping ─ tokenizer ─ aggregate ─ combine ─┬─ SubchartResult
//!                                                        └─ style ─ renderer ─ RenderedImage
//! ```
//!
//! Every stage is a function of its inputs and the immutable [`Settings`].
//! [`Pipeline`] bundles the settings with a tokenizer and a renderer for
//! callers that do not need the stages separately.

pub mod aggregate;
pub mod combine;
pub mod grouping;
pub mod runner;
pub mod stats;

use polycloud_types::{PipelineError, Record};

use crate::analyzer::tokenizer::Tokenizer;
use crate::config::Settings;
use crate::render::Renderer;

pub use aggregate::{aggregate, CountOptions};
pub use combine::{combine, SubchartResult};
pub use grouping::{group, GroupingMode, UnsupportedLanguagePolicy};
pub use runner::{
    generate_images, tokenize_and_count, CountOutcome, FailurePolicy, GroupFailure, RenderFailure,
    RenderOutcome, RenderedImage,
};
pub use stats::PipelineStats;

/// Settings plus the two external adapters.
#[derive(Debug)]
pub struct Pipeline<T, R> {
    settings: Settings,
    tokenizer: T,
    renderer: R,
}

impl<T: Tokenizer, R: Renderer> Pipeline<T, R> {
    /// Creates a pipeline.
    pub fn new(settings: Settings, tokenizer: T, renderer: R) -> Self {
        Self {
            settings,
            tokenizer,
            renderer,
        }
    }

    /// Resolved settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// See [`tokenize_and_count`].
    pub fn tokenize_and_count<Rec: Record>(
        &self,
        records: &[Rec],
    ) -> Result<CountOutcome, PipelineError> {
        tokenize_and_count(records, &self.settings, &self.tokenizer)
    }

    /// See [`generate_images`].
    pub fn generate_images(&self, results: &[SubchartResult]) -> RenderOutcome {
        generate_images(results, &self.settings, &self.renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::tokenizer::UnicodeTokenizer;
    use crate::config::WordcloudConfig;
    use crate::render::ManifestRenderer;
    use std::collections::HashMap;

    #[test]
    fn end_to_end() {
        let config = WordcloudConfig {
            remove_stopwords: true,
            remove_punctuation: true,
            ..WordcloudConfig::new("text")
        };
        let settings = Settings::from_config(&config).expect("valid");
        let pipeline = Pipeline::new(settings, UnicodeTokenizer::new(), ManifestRenderer::new());

        let records: Vec<HashMap<String, String>> = ["Clouds, clouds everywhere!", "Grey clouds."]
            .iter()
            .map(|t| HashMap::from([("text".to_owned(), (*t).to_owned())]))
            .collect();

        let outcome = pipeline.tokenize_and_count(&records).expect("counted");
        assert_eq!(outcome.results.len(), 1);
        let frequencies = &outcome.results[0].frequencies;
        assert_eq!(frequencies.get("clouds"), Some(2));
        assert_eq!(frequencies.get("Clouds"), Some(1));
        assert_eq!(frequencies.get("!"), None);

        let images = pipeline.generate_images(&outcome.results);
        assert_eq!(images.images[0].filename, "wordcloud.json");
        assert!(images.failures.is_empty());
    }
}
