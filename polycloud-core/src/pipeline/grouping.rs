//! Grouping Engine
//!
//! Partitions rows into groups keyed by `(language, subchart)`. Which part of
//! the key comes from a column and which from configuration depends on the
//! [`GroupingMode`]:
//!
//! | mode           | language from    | subchart from   |
//! |----------------|------------------|-----------------|
//! | `None`         | configuration    | -               |
//! | `LanguageOnly` | language column  | -               |
//! | `SubchartOnly` | configuration    | subchart column |
//! | `Both`         | language column  | subchart column |
//!
//! Rows missing a value the mode needs are dropped before grouping. Groups
//! come out sorted by key, so a run is reproducible regardless of row order.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use polycloud_types::{ConfigError, GroupKey, PipelineError, Record, Row};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// How rows are partitioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupingMode {
    /// A single group in the configured language.
    None {
        /// Tokenization language.
        language: String,
    },
    /// One group per language value.
    LanguageOnly {
        /// Column holding language codes.
        language_column: String,
    },
    /// One group per subchart value, all in the configured language.
    SubchartOnly {
        /// Tokenization language.
        language: String,
        /// Column holding subchart values.
        subchart_column: String,
    },
    /// One group per `(language, subchart)` pair.
    Both {
        /// Column holding language codes.
        language_column: String,
        /// Column holding subchart values.
        subchart_column: String,
    },
}

impl GroupingMode {
    /// The configured language column, if any.
    pub fn language_column(&self) -> Option<&str> {
        match self {
            Self::LanguageOnly { language_column } | Self::Both { language_column, .. } => {
                Some(language_column)
            }
            Self::None { .. } | Self::SubchartOnly { .. } => None,
        }
    }

    /// The configured language when it is fixed rather than read per row.
    pub fn fixed_language(&self) -> Option<&str> {
        match self {
            Self::None { language } | Self::SubchartOnly { language, .. } => Some(language),
            Self::LanguageOnly { .. } | Self::Both { .. } => None,
        }
    }

    /// The configured subchart column, if any.
    pub fn subchart_column(&self) -> Option<&str> {
        match self {
            Self::SubchartOnly {
                subchart_column, ..
            }
            | Self::Both {
                subchart_column, ..
            } => Some(subchart_column),
            Self::None { .. } | Self::LanguageOnly { .. } => None,
        }
    }

    /// `true` when subcharts are the detected languages themselves.
    pub fn language_is_subchart(&self) -> bool {
        matches!(
            self,
            Self::Both { language_column, subchart_column } if language_column == subchart_column
        )
    }

    /// Columns every record must carry.
    pub fn columns(&self) -> SmallVec<[&str; 2]> {
        let mut columns = SmallVec::new();
        columns.extend(self.language_column());
        if let Some(subchart) = self.subchart_column() {
            if !columns.contains(&subchart) {
                columns.push(subchart);
            }
        }
        columns
    }

    fn key(&self, row: &Row) -> Option<GroupKey> {
        let language = row.language.as_deref().filter(|v| !is_blank(v));
        let subchart = row.subchart.as_deref().filter(|v| !is_blank(v));
        match self {
            Self::None { language: fixed } => Some(GroupKey::language(fixed.as_str())),
            Self::LanguageOnly { .. } => language.map(GroupKey::language),
            Self::SubchartOnly { language: fixed, .. } => {
                subchart.map(|s| GroupKey::with_subchart(fixed.as_str(), s))
            }
            Self::Both { .. } => Some(GroupKey::with_subchart(language?, subchart?)),
        }
    }
}

/// What to do with rows whose language the tokenizer cannot handle when
/// subcharting by language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedLanguagePolicy {
    /// Drop the affected groups and log how many rows were lost.
    #[default]
    Drop,
    /// Abort with `PipelineError::UnsupportedLanguage`.
    Fail,
}

/// Rows sharing one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Group key.
    pub key: GroupKey,
    /// Non-null texts of the group's rows, in row order.
    pub texts: Vec<String>,
    /// Number of rows in the group, including rows with null text.
    pub rows: usize,
}

/// Output of [`group`]: the groups plus what was dropped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    /// Groups in key order.
    pub groups: Vec<Group>,
    /// Rows seen.
    pub rows_read: usize,
    /// Rows dropped for a missing grouping value.
    pub rows_missing_key: usize,
    /// Rows dropped for an unsupported language.
    pub rows_unsupported: usize,
    /// Distinct unsupported language codes, sorted.
    pub unsupported_languages: Vec<String>,
}

impl Grouping {
    /// Rows that made it into a group.
    pub fn rows_grouped(&self) -> usize {
        self.groups.iter().map(|g| g.rows).sum()
    }
}

/// Projects a record onto the columns `mode` uses.
pub fn project<R: Record + ?Sized>(record: &R, text_column: &str, mode: &GroupingMode) -> Row {
    Row {
        text: record.get(text_column).map(str::to_owned),
        language: mode
            .language_column()
            .and_then(|c| record.get(c))
            .map(str::to_owned),
        subchart: mode
            .subchart_column()
            .and_then(|c| record.get(c))
            .map(str::to_owned),
    }
}

/// Fails if a grouping column is carried by none of the records.
pub fn check_columns<R: Record>(records: &[R], mode: &GroupingMode) -> Result<(), ConfigError> {
    if records.is_empty() {
        return Ok(());
    }
    for column in mode.columns() {
        if !records.iter().any(|r| r.has_column(column)) {
            return Err(ConfigError::UnknownColumn {
                column: column.to_owned(),
            });
        }
    }
    Ok(())
}

/// Groups `rows` according to `mode`.
///
/// `supports` decides which languages the tokenizer can handle; it is only
/// consulted when subcharts are languages.
///
/// # Errors
///
/// - `PipelineError::UnsupportedLanguage` under [`UnsupportedLanguagePolicy::Fail`]
/// - `PipelineError::EmptyInput` if no group survives
pub fn group<I, F>(
    rows: I,
    mode: &GroupingMode,
    policy: UnsupportedLanguagePolicy,
    supports: F,
) -> Result<Grouping, PipelineError>
where
    I: IntoIterator<Item = Row>,
    F: Fn(&str) -> bool,
{
    let mut grouped: BTreeMap<GroupKey, Group> = BTreeMap::new();
    let mut grouping = Grouping::default();

    for row in rows {
        grouping.rows_read += 1;
        let Some(key) = mode.key(&row) else {
            grouping.rows_missing_key += 1;
            continue;
        };
        let group = grouped.entry(key).or_insert_with_key(|key| Group {
            key: key.clone(),
            texts: Vec::new(),
            rows: 0,
        });
        group.rows += 1;
        if let Some(text) = row.text {
            group.texts.push(text);
        }
    }

    if grouping.rows_missing_key > 0 {
        debug!(
            "dropped {} rows with a missing value in {:?}",
            grouping.rows_missing_key,
            mode.columns()
        );
    }

    if mode.language_is_subchart() {
        let mut unsupported = BTreeSet::new();
        grouped.retain(|key, group| {
            if supports(&key.language) {
                return true;
            }
            grouping.rows_unsupported += group.rows;
            unsupported.insert(key.language.clone());
            false
        });
        grouping.unsupported_languages = unsupported.into_iter().collect();

        if grouping.rows_unsupported > 0 {
            match policy {
                UnsupportedLanguagePolicy::Fail => {
                    return Err(PipelineError::UnsupportedLanguage {
                        languages: grouping.unsupported_languages,
                        rows: grouping.rows_unsupported,
                    });
                }
                UnsupportedLanguagePolicy::Drop => warn!(
                    "dropped {} rows with unsupported language codes: {}",
                    grouping.rows_unsupported,
                    grouping.unsupported_languages.join(", ")
                ),
            }
        }
    }

    if grouped.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    grouping.groups = grouped.into_values().collect();
    Ok(grouping)
}

#[inline]
fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
