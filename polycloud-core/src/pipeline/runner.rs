//! The two pipeline entry points: counting and rendering.

use std::time::Instant;

use log::{debug, info, warn};
use polycloud_types::{ConfigError, GroupKey, PipelineError, Record, RenderError, TokenizeError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analyzer::tokenizer::Tokenizer;
use crate::config::Settings;
use crate::frequency::FrequencyMap;
use crate::naming::{chart_stem, UniqueNames};
use crate::pipeline::aggregate::aggregate;
use crate::pipeline::combine::{combine, SubchartResult};
use crate::pipeline::grouping::{check_columns, group, project, Group};
use crate::pipeline::stats::PipelineStats;
use crate::render::{RenderRequest, Renderer};

/// What to do when tokenizing one group fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Skip the group, report it in [`CountOutcome::failures`].
    #[default]
    Isolate,
    /// Stop with `PipelineError::Tokenization`.
    Abort,
}

/// A group left out because its tokenization failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFailure {
    /// The failed group.
    pub group: GroupKey,
    /// Adapter error.
    pub error: TokenizeError,
}

/// Result of [`tokenize_and_count`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountOutcome {
    /// Non-empty subcharts in key order.
    pub results: Vec<SubchartResult>,
    /// Isolated group failures in key order.
    pub failures: Vec<GroupFailure>,
    /// Row and token accounting.
    pub stats: PipelineStats,
}

/// One encoded chart ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// File name including extension.
    pub filename: String,
    /// Chart title.
    pub title: String,
    /// Encoded image.
    pub bytes: Vec<u8>,
}

/// A chart that could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    /// Subchart id of the chart.
    pub subchart: String,
    /// Adapter error.
    pub error: RenderError,
}

/// Result of [`generate_images`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Rendered charts in subchart order.
    pub images: Vec<RenderedImage>,
    /// Charts that failed, in subchart order.
    pub failures: Vec<RenderFailure>,
}

/// Runs `f`, logging its start and duration.
pub(crate) fn timed<T>(label: &str, f: impl FnOnce() -> T) -> T {
    info!("{label}...");
    let start = Instant::now();
    let value = f();
    info!("{label}: Done in {:.2} seconds", start.elapsed().as_secs_f64());
    value
}

/// Groups, tokenizes, counts and combines `records`.
///
/// Groups are tokenized in parallel; results and failures still come out in
/// group key order.
///
/// # Errors
///
/// - `PipelineError::Config` if a grouping column is missing from the data or
///   the fixed language is not supported by `tokenizer`
/// - `PipelineError::UnsupportedLanguage` and `PipelineError::EmptyInput`
///   from grouping
/// - `PipelineError::Tokenization` for the first failed group under
///   [`FailurePolicy::Abort`]
pub fn tokenize_and_count<R, T>(
    records: &[R],
    settings: &Settings,
    tokenizer: &T,
) -> Result<CountOutcome, PipelineError>
where
    R: Record,
    T: Tokenizer + ?Sized,
{
    check_columns(records, &settings.mode)?;
    if let Some(language) = settings.mode.fixed_language() {
        if !tokenizer.supports(language) {
            return Err(ConfigError::UnsupportedLanguage {
                code: language.to_owned(),
            }
            .into());
        }
    }

    let grouping = timed("Grouping rows", || {
        let rows = records
            .iter()
            .map(|record| project(record, &settings.text_column, &settings.mode));
        group(rows, &settings.mode, settings.unsupported_languages, |language| {
            tokenizer.supports(language)
        })
    })?;
    let mut stats = PipelineStats::from_grouping(&grouping);

    let counted: Vec<(GroupKey, Result<FrequencyMap, TokenizeError>)> =
        timed("Tokenizing and counting", || {
            grouping
                .groups
                .into_par_iter()
                .map(|group| count_group(group, settings, tokenizer))
                .collect()
        });

    let mut per_group = Vec::with_capacity(counted.len());
    let mut failures = Vec::new();
    for (key, result) in counted {
        match result {
            Ok(counts) => {
                stats.tokens_counted += counts.total();
                per_group.push((key, counts));
            }
            Err(error) => match settings.on_group_error {
                FailurePolicy::Abort => {
                    return Err(PipelineError::Tokenization { group: key, source: error });
                }
                FailurePolicy::Isolate => {
                    warn!("skipping group {key}: {error}");
                    failures.push(GroupFailure { group: key, error });
                }
            },
        }
    }
    stats.groups_failed = failures.len();

    let results = combine(per_group, settings.count.case_insensitive);
    stats.subcharts = results.len();
    if results.is_empty() {
        warn!("every token was filtered out, nothing to render");
    }
    info!("{stats}");

    Ok(CountOutcome {
        results,
        failures,
        stats,
    })
}

fn count_group<T: Tokenizer + ?Sized>(
    group: Group,
    settings: &Settings,
    tokenizer: &T,
) -> (GroupKey, Result<FrequencyMap, TokenizeError>) {
    debug!("group {}: {} rows, {} texts", group.key, group.rows, group.texts.len());
    let texts: Vec<&str> = group.texts.iter().map(String::as_str).collect();
    let result = tokenizer
        .tokenize(&texts, &group.key.language)
        .and_then(|docs| {
            if docs.len() != texts.len() {
                return Err(TokenizeError::Backend(format!(
                    "expected {} token sequences, got {}",
                    texts.len(),
                    docs.len()
                )));
            }
            Ok(aggregate(docs.iter().flatten(), settings.count))
        });
    (group.key, result)
}

/// Renders one chart per subchart result.
///
/// Each chart gets its top `max_words` words, the font of its language and a
/// unique sanitized file name. Charts render in parallel; a failed chart is
/// reported without affecting the others.
pub fn generate_images<R>(
    results: &[SubchartResult],
    settings: &Settings,
    renderer: &R,
) -> RenderOutcome
where
    R: Renderer + ?Sized,
{
    let mut names = UniqueNames::new();
    let stems: Vec<String> = results
        .iter()
        .map(|result| names.claim(chart_stem(settings.mode.subchart_column(), &result.subchart)))
        .collect();

    let rendered: Vec<Result<RenderedImage, RenderFailure>> = timed("Generating images", || {
        results
            .par_iter()
            .zip(stems.par_iter())
            .map(|(result, stem)| render_chart(result, stem, settings, renderer))
            .collect()
    });

    let mut outcome = RenderOutcome::default();
    for item in rendered {
        match item {
            Ok(image) => outcome.images.push(image),
            Err(failure) => {
                warn!("cannot render subchart {:?}: {}", failure.subchart, failure.error);
                outcome.failures.push(failure);
            }
        }
    }
    outcome
}

fn render_chart<R: Renderer + ?Sized>(
    result: &SubchartResult,
    stem: &str,
    settings: &Settings,
    renderer: &R,
) -> Result<RenderedImage, RenderFailure> {
    let language = if settings.mode.language_is_subchart() {
        result.subchart.as_str()
    } else {
        settings.language.as_str()
    };
    let font_path = settings.style.font_path(language);
    let words = result.frequencies.top(settings.max_words);
    let request = RenderRequest {
        words: &words,
        font_path: &font_path,
        title: Some(stem),
        palette: settings.style.palette(),
    };

    match renderer.render(&request) {
        Ok(bytes) => Ok(RenderedImage {
            filename: format!("{stem}.{}", renderer.extension()),
            title: stem.to_owned(),
            bytes,
        }),
        Err(error) => Err(RenderFailure {
            subchart: result.subchart.clone(),
            error,
        }),
    }
}
