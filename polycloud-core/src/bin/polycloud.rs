//! Word clouds from JSON-lines records.
//!
//! Reads one JSON object per line, counts words per subchart and writes one
//! chart per subchart into the output directory.
//!
//! ```bash
//! # one chart of the `review` column
//! polycloud reviews.jsonl --text-column review
//!
//! # one chart per detected language
//! polycloud reviews.jsonl --text-column review --language language_column \
//!     --language-column lang --subchart-column lang --remove-stopwords
//!
//! # options from a file, overridden on the command line
//! polycloud reviews.jsonl --config wordcloud.json --max-words 50
//! ```
//!
//! Logging goes through `env_logger`; `RUST_LOG` takes precedence over
//! `-v` / `-q`. The exit code is non-zero if any group or chart failed.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use memchr::memchr_iter;
use polycloud_core::config::{Settings, WordcloudConfig};
use polycloud_core::{
    FailurePolicy, ManifestRenderer, Pipeline, UnicodeTokenizer, UnsupportedLanguagePolicy,
};
use serde_json::Value;

type JsonRecord = BTreeMap<String, Option<String>>;

#[derive(Debug, Parser)]
#[command(name = "polycloud", version, about = "Multilingual word clouds from JSON-lines records")]
struct Cli {
    /// JSON-lines input, one object per line.
    input: PathBuf,

    /// JSON file with pipeline options.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the charts are written to.
    #[arg(short, long, default_value = "wordclouds")]
    output_dir: PathBuf,

    /// Column holding the text.
    #[arg(long)]
    text_column: Option<String>,

    /// Language code, or `language_column`.
    #[arg(long)]
    language: Option<String>,

    /// Column holding per-row language codes.
    #[arg(long)]
    language_column: Option<String>,

    /// Column splitting the output into several charts.
    #[arg(long)]
    subchart_column: Option<String>,

    /// Drop stopwords.
    #[arg(long)]
    remove_stopwords: bool,

    /// Drop punctuation.
    #[arg(long)]
    remove_punctuation: bool,

    /// Merge casing variants of a word.
    #[arg(long)]
    case_insensitive: bool,

    /// Words per chart.
    #[arg(long)]
    max_words: Option<usize>,

    /// Built-in palette id, or `custom`.
    #[arg(long)]
    palette: Option<String>,

    /// Custom palette color; repeat for several.
    #[arg(long = "color")]
    colors: Vec<String>,

    /// Default font file name.
    #[arg(long)]
    font: Option<String>,

    /// Directory holding font files.
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Fail a chart whose font file is missing.
    #[arg(long)]
    require_fonts: bool,

    /// Reject texts longer than this many characters.
    #[arg(long)]
    max_chars: Option<usize>,

    /// Fail instead of dropping rows in unsupported languages.
    #[arg(long)]
    fail_on_unsupported: bool,

    /// Stop at the first group that cannot be tokenized.
    #[arg(long)]
    abort_on_error: bool,

    /// Log debug output.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Log warnings and errors only.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    fn load_config(&self) -> Result<WordcloudConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("cannot read config {}", path.display()))?;
                WordcloudConfig::from_json_str(&json)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => WordcloudConfig::default(),
        };

        if let Some(v) = &self.text_column {
            config.text_column = v.clone();
        }
        if let Some(v) = &self.language {
            config.language = v.clone();
        }
        if let Some(v) = &self.language_column {
            config.language_column = Some(v.clone());
        }
        if let Some(v) = &self.subchart_column {
            config.subchart_column = Some(v.clone());
        }
        config.remove_stopwords |= self.remove_stopwords;
        config.remove_punctuation |= self.remove_punctuation;
        config.case_insensitive |= self.case_insensitive;
        if let Some(v) = self.max_words {
            config.max_words = v;
        }
        if let Some(v) = &self.palette {
            config.color_palette = Some(v.clone());
        }
        if !self.colors.is_empty() {
            config.color_list = self.colors.clone();
        }
        if let Some(v) = &self.font {
            config.font = v.clone();
        }
        if let Some(v) = &self.font_dir {
            config.font_dir = v.clone();
        }
        if self.fail_on_unsupported {
            config.unsupported_languages = UnsupportedLanguagePolicy::Fail;
        }
        if self.abort_on_error {
            config.on_group_error = FailurePolicy::Abort;
        }
        Ok(config)
    }
}

/// Parses JSON lines. Blank lines are skipped; strings are kept as is,
/// `null` becomes a missing value and anything else its JSON text.
fn parse_records(bytes: &[u8]) -> Result<Vec<JsonRecord>> {
    let mut records = Vec::new();
    let mut start = 0;
    let ends = memchr_iter(b'\n', bytes).chain(std::iter::once(bytes.len()));
    for (line_no, end) in ends.enumerate() {
        let line = &bytes[start..end];
        start = end + 1;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let object: serde_json::Map<String, Value> = serde_json::from_slice(line)
            .with_context(|| format!("line {}: expected a JSON object", line_no + 1))?;
        records.push(
            object
                .into_iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::Null => None,
                        Value::String(s) => Some(s),
                        other => Some(other.to_string()),
                    };
                    (key, value)
                })
                .collect(),
        );
    }
    Ok(records)
}

fn run(cli: &Cli) -> Result<bool> {
    let config = cli.load_config()?;
    let settings = Settings::from_config(&config).context("invalid configuration")?;

    let bytes = fs::read(&cli.input)
        .with_context(|| format!("cannot read {}", cli.input.display()))?;
    let records = parse_records(&bytes)
        .with_context(|| format!("cannot parse {}", cli.input.display()))?;
    info!("read {} records from {}", records.len(), cli.input.display());

    let tokenizer = match cli.max_chars {
        Some(max) => UnicodeTokenizer::with_max_chars(max),
        None => UnicodeTokenizer::new(),
    };
    let renderer = ManifestRenderer::new().require_fonts(cli.require_fonts);
    let pipeline = Pipeline::new(settings, tokenizer, renderer);

    let counted = pipeline.tokenize_and_count(&records)?;
    let rendered = pipeline.generate_images(&counted.results);

    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("cannot create {}", cli.output_dir.display()))?;
    for image in &rendered.images {
        let path = cli.output_dir.join(&image.filename);
        fs::write(&path, &image.bytes)
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!("wrote {}", path.display());
    }

    for failure in &counted.failures {
        error!("group {} failed: {}", failure.group, failure.error);
    }
    for failure in &rendered.failures {
        error!("chart {:?} failed: {}", failure.subchart, failure.error);
    }
    Ok(counted.failures.is_empty() && rendered.failures.is_empty())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    if run(&cli)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
