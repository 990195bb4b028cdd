//! Multilingual word-cloud pipeline.
//!
//! Takes rows of free text, optionally split by language and by a
//! categorical "subchart" column, and turns them into one word-frequency
//! distribution per subchart, then into one chart per distribution.
//!
//! - [`pipeline`]: grouping, counting, combining and the two entry points
//! - [`analyzer`]: the tokenizer adapter and its building blocks
//! - [`style`]: deterministic font and color choice
//! - [`render`]: the render adapter
//! - [`config`]: options and their resolved form
//!
//! Output is reproducible: groups are processed in key order, colors come
//! from a hash of the token, and file names from the subchart id.
//!
//! ```
//! use polycloud_core::{generate_images, tokenize_and_count, ManifestRenderer, Settings,
//!     UnicodeTokenizer, WordcloudConfig};
//! use std::collections::HashMap;
//!
//! let settings = Settings::from_config(&WordcloudConfig::new("text")).unwrap();
//! let records = vec![HashMap::from([("text".to_string(), "Rain, rain, go away".to_string())])];
//!
//! let counted = tokenize_and_count(&records, &settings, &UnicodeTokenizer::new()).unwrap();
//! assert_eq!(counted.results[0].frequencies.get("rain"), Some(1));
//!
//! let images = generate_images(&counted.results, &settings, &ManifestRenderer::new());
//! assert_eq!(images.images[0].filename, "wordcloud.json");
//! ```

#![warn(missing_docs)]

pub mod analyzer;
pub mod config;
pub mod frequency;
pub mod naming;
pub mod pipeline;
pub mod render;
pub mod style;

pub use analyzer::{Tokenizer, UnicodeTokenizer};
pub use config::{Settings, WordcloudConfig};
pub use frequency::FrequencyMap;
pub use pipeline::{
    generate_images, tokenize_and_count, CountOutcome, FailurePolicy, Pipeline, PipelineStats,
    RenderOutcome, RenderedImage, SubchartResult, UnsupportedLanguagePolicy,
};
pub use polycloud_types::{
    ConfigError, GroupKey, PipelineError, Record, RenderError, Row, Token, TokenizeError,
};
pub use render::{ManifestRenderer, RenderRequest, Renderer};
pub use style::{Palette, StyleResolver};
