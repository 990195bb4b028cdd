use std::collections::BTreeMap;

use polycloud_core::config::{Settings, WordcloudConfig, LANGUAGE_COLUMN};
use polycloud_core::{
    generate_images, tokenize_and_count, ConfigError, FailurePolicy, FrequencyMap, GroupKey,
    ManifestRenderer, PipelineError, Token, TokenizeError, Tokenizer, UnicodeTokenizer,
    UnsupportedLanguagePolicy,
};
use proptest::prelude::*;
use serde_json::Value;

type Record = BTreeMap<String, Option<String>>;

fn record(fields: &[(&str, Option<&str>)]) -> Record {
    fields
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.map(str::to_owned)))
        .collect()
}

fn text(t: &str) -> Record {
    record(&[("text", Some(t))])
}

fn with_lang(t: &str, lang: &str) -> Record {
    record(&[("text", Some(t)), ("lang", Some(lang))])
}

fn by_language() -> WordcloudConfig {
    WordcloudConfig {
        language: LANGUAGE_COLUMN.into(),
        language_column: Some("lang".into()),
        subchart_column: Some("lang".into()),
        ..WordcloudConfig::new("text")
    }
}

fn settings(config: &WordcloudConfig) -> Settings {
    Settings::from_config(config).expect("valid config")
}

fn manifest(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("manifest is json")
}

#[test]
fn single_language_counts_match_manual_tokenization() {
    let records = vec![text("The cat sat."), text("The cat ran."), text("A dog sat!")];
    let settings = settings(&WordcloudConfig::new("text"));

    let outcome = tokenize_and_count(&records, &settings, &UnicodeTokenizer::new())
        .expect("counted");

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].subchart, "");
    assert_eq!(
        outcome.results[0].frequencies,
        FrequencyMap::from([
            ("The", 2),
            ("cat", 2),
            ("sat", 2),
            ("ran", 1),
            ("A", 1),
            ("dog", 1),
            (".", 2),
            ("!", 1),
        ])
    );
    assert_eq!(outcome.stats.rows_read, 3);
    assert_eq!(outcome.stats.tokens_counted, 12);
}

#[test]
fn language_as_subchart_yields_one_chart_per_language() {
    let records = vec![
        with_lang("Hello world", "en"),
        with_lang("Bonjour le monde", "fr"),
        with_lang("你好世界", "zh"),
        with_lang("Goodbye world", "en"),
    ];
    let settings = settings(&by_language());

    let outcome = tokenize_and_count(&records, &settings, &UnicodeTokenizer::new())
        .expect("counted");
    let ids: Vec<&str> = outcome.results.iter().map(|r| r.subchart.as_str()).collect();
    assert_eq!(ids, ["en", "fr", "zh"]);
    assert_eq!(outcome.results[0].frequencies.get("world"), Some(2));

    let images = generate_images(&outcome.results, &settings, &ManifestRenderer::new());
    assert!(images.failures.is_empty());
    for (image, code) in images.images.iter().zip(["en", "fr", "zh"]) {
        assert!(image.filename.contains(code), "{} lacks {code}", image.filename);
    }

    let zh = manifest(&images.images[2].bytes);
    let font = zh["font"].as_str().expect("font path");
    assert!(font.ends_with("NotoSansCJKsc-Regular.otf"), "{font}");
}

#[test]
fn rows_with_null_subchart_are_excluded() {
    let records = vec![
        record(&[("text", Some("kept words")), ("topic", Some("a"))]),
        record(&[("text", Some("dropped words here")), ("topic", None)]),
        record(&[("text", Some("also dropped"))]),
    ];
    let config = WordcloudConfig {
        subchart_column: Some("topic".into()),
        ..WordcloudConfig::new("text")
    };

    let outcome = tokenize_and_count(&records, &settings(&config), &UnicodeTokenizer::new())
        .expect("counted");

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].frequencies.total(), 2);
    assert_eq!(outcome.results[0].frequencies.get("dropped"), None);
    assert_eq!(outcome.stats.rows_missing_key, 2);
}

#[test]
fn case_insensitive_majority_variant_wins() {
    let records = vec![text("The The The"), text("the the the the the")];
    let config = WordcloudConfig {
        case_insensitive: true,
        ..WordcloudConfig::new("text")
    };

    let outcome = tokenize_and_count(&records, &settings(&config), &UnicodeTokenizer::new())
        .expect("counted");
    assert_eq!(outcome.results[0].frequencies, FrequencyMap::from([("the", 8)]));
}

#[test]
fn unsupported_languages_are_dropped_with_row_count() {
    let records = vec![
        with_lang("hello", "en"),
        with_lang("nuqneH", "tlh"),
        with_lang("Qapla'", "tlh"),
    ];
    let settings = settings(&by_language());

    let outcome = tokenize_and_count(&records, &settings, &UnicodeTokenizer::new())
        .expect("counted");
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.stats.rows_unsupported_language, 2);
    assert!(outcome.stats.to_string().contains("2 unsupported language"));
}

#[test]
fn unsupported_languages_fail_with_row_count() {
    let records = vec![with_lang("hello", "en"), with_lang("nuqneH", "tlh")];
    let config = WordcloudConfig {
        unsupported_languages: UnsupportedLanguagePolicy::Fail,
        ..by_language()
    };

    let err = tokenize_and_count(&records, &settings(&config), &UnicodeTokenizer::new())
        .unwrap_err();
    assert_eq!(
        err,
        PipelineError::UnsupportedLanguage {
            languages: vec!["tlh".into()],
            rows: 1
        }
    );
}

#[test]
fn missing_grouping_column_is_config_error() {
    let records = vec![text("hello")];
    let err = tokenize_and_count(&records, &settings(&by_language()), &UnicodeTokenizer::new())
        .unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn no_rows_is_empty_input() {
    let records: Vec<Record> = Vec::new();
    let settings = settings(&WordcloudConfig::new("text"));
    let err = tokenize_and_count(&records, &settings, &UnicodeTokenizer::new()).unwrap_err();
    assert_eq!(err, PipelineError::EmptyInput);
}

#[test]
fn fixed_language_outside_the_tokenizer_is_rejected() {
    let config = WordcloudConfig {
        language: "tlh".into(),
        ..WordcloudConfig::new("text")
    };
    let err = tokenize_and_count(&[text("Qapla'")], &settings(&config), &UnicodeTokenizer::new())
        .unwrap_err();
    assert_eq!(
        err,
        PipelineError::Config(ConfigError::UnsupportedLanguage { code: "tlh".into() })
    );
}

#[test]
fn everything_filtered_yields_no_results() {
    let records = vec![text("!!! ... ???")];
    let config = WordcloudConfig {
        remove_punctuation: true,
        ..WordcloudConfig::new("text")
    };
    let outcome = tokenize_and_count(&records, &settings(&config), &UnicodeTokenizer::new())
        .expect("counted");
    assert!(outcome.results.is_empty());
    assert!(outcome.failures.is_empty());
}

/// Delegates to the Unicode tokenizer but fails on French.
struct NoFrench;

impl Tokenizer for NoFrench {
    fn supports(&self, language: &str) -> bool {
        UnicodeTokenizer::new().supports(language)
    }

    fn tokenize(&self, texts: &[&str], language: &str) -> Result<Vec<Vec<Token>>, TokenizeError> {
        if language == "fr" {
            return Err(TokenizeError::Backend("model not loaded".into()));
        }
        UnicodeTokenizer::new().tokenize(texts, language)
    }
}

#[test]
fn tokenization_failure_is_isolated() {
    let records = vec![with_lang("hello", "en"), with_lang("bonjour", "fr")];
    let outcome = tokenize_and_count(&records, &settings(&by_language()), &NoFrench)
        .expect("isolated");

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].subchart, "en");
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].group, GroupKey::with_subchart("fr", "fr"));
}

#[test]
fn tokenization_failure_aborts_naming_group() {
    let records = vec![with_lang("hello", "en"), with_lang("bonjour", "fr")];
    let config = WordcloudConfig {
        on_group_error: FailurePolicy::Abort,
        ..by_language()
    };

    let err = tokenize_and_count(&records, &settings(&config), &NoFrench).unwrap_err();
    match err {
        PipelineError::Tokenization { group, .. } => {
            assert_eq!(group, GroupKey::with_subchart("fr", "fr"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn text_too_long_is_reported_per_group() {
    let records = vec![with_lang("short", "en"), with_lang("much much longer", "fr")];
    let outcome = tokenize_and_count(
        &records,
        &settings(&by_language()),
        &UnicodeTokenizer::with_max_chars(8),
    )
    .expect("isolated");
    assert_eq!(
        outcome.failures[0].error,
        TokenizeError::TextTooLong {
            length: 16,
            max_length: 8
        }
    );
}

#[test]
fn two_runs_are_byte_identical() {
    let records = vec![
        with_lang("Clouds drift over the quiet hills", "en"),
        with_lang("Les nuages passent sur les collines", "fr"),
        with_lang("Clouds again, and rain", "en"),
    ];
    let config = WordcloudConfig {
        color_palette: Some("pastel".into()),
        ..by_language()
    };

    let run = || {
        let settings = settings(&config);
        let outcome =
            tokenize_and_count(&records, &settings, &UnicodeTokenizer::new()).expect("counted");
        generate_images(&outcome.results, &settings, &ManifestRenderer::new()).images
    };
    assert_eq!(run(), run());
}

#[test]
fn order66_uses_easter_egg_font_and_one_chart() {
    let records = vec![text("It's a trap")];
    let config = WordcloudConfig {
        subchart_column: Some("order66".into()),
        ..WordcloudConfig::new("text")
    };
    let settings = settings(&config);

    let outcome = tokenize_and_count(&records, &settings, &UnicodeTokenizer::new())
        .expect("counted");
    let images = generate_images(&outcome.results, &settings, &ManifestRenderer::new());

    assert_eq!(images.images.len(), 1);
    assert_eq!(images.images[0].filename, "wordcloud.json");
    let font = manifest(&images.images[0].bytes)["font"]
        .as_str()
        .map(str::to_owned)
        .expect("font path");
    assert!(font.ends_with("DeathStar.otf"), "{font}");
}

#[test]
fn max_words_keeps_most_frequent() {
    let records = vec![text("a a a b b c d")];
    let config = WordcloudConfig {
        max_words: 2,
        ..WordcloudConfig::new("text")
    };
    let settings = settings(&config);

    let outcome = tokenize_and_count(&records, &settings, &UnicodeTokenizer::new())
        .expect("counted");
    let images = generate_images(&outcome.results, &settings, &ManifestRenderer::new());
    let words = manifest(&images.images[0].bytes)["words"].clone();

    assert_eq!(words.as_array().map(Vec::len), Some(2));
    assert_eq!(words[0]["text"], "a");
    assert_eq!(words[1]["text"], "b");
}

proptest! {
    #[test]
    fn row_order_does_not_change_results(
        rows in Just(vec![
            ("The rain in Spain", "en"),
            ("stays mainly in the plain", "en"),
            ("la pluie en Espagne", "fr"),
            ("The RAIN, the rain!", "en"),
            ("reste dans la plaine", "fr"),
        ])
        .prop_shuffle(),
        case_insensitive in any::<bool>(),
    ) {
        let config = WordcloudConfig { case_insensitive, ..by_language() };
        let settings = settings(&config);
        let tokenizer = UnicodeTokenizer::new();

        let shuffled: Vec<Record> = rows.iter().map(|(t, l)| with_lang(t, l)).collect();
        let mut sorted = rows.clone();
        sorted.sort();
        let ordered: Vec<Record> = sorted.iter().map(|(t, l)| with_lang(t, l)).collect();

        let a = tokenize_and_count(&shuffled, &settings, &tokenizer).expect("counted");
        let b = tokenize_and_count(&ordered, &settings, &tokenizer).expect("counted");
        prop_assert_eq!(a.results, b.results);
    }
}
