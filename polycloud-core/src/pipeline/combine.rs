//! Subchart Combiner
//!
//! Groups that differ only by language but share a subchart are merged into
//! one frequency map. Subcharts left empty by token filtering are dropped.

use std::collections::BTreeMap;

use log::debug;
use polycloud_types::GroupKey;

use crate::analyzer::normalizer::fold_case;
use crate::frequency::FrequencyMap;

/// Subchart id used when no subchart column is configured.
pub const NO_SUBCHART: &str = "";

/// Final frequencies of one subchart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubchartResult {
    /// Subchart value; empty when subcharting is off.
    pub subchart: String,
    /// Merged, non-empty frequencies.
    pub frequencies: FrequencyMap,
}

/// Merges per-group counts into one result per subchart, sorted by id.
///
/// With `case_insensitive`, merged maps are folded again: two languages may
/// each have picked a different casing of the same token.
pub fn combine<I>(per_group: I, case_insensitive: bool) -> Vec<SubchartResult>
where
    I: IntoIterator<Item = (GroupKey, FrequencyMap)>,
{
    let mut merged: BTreeMap<String, FrequencyMap> = BTreeMap::new();
    for (key, counts) in per_group {
        let subchart = key.subchart.unwrap_or_else(|| NO_SUBCHART.to_owned());
        merged.entry(subchart).or_default().merge(counts);
    }

    merged
        .into_iter()
        .filter_map(|(subchart, frequencies)| {
            if frequencies.is_empty() {
                debug!("subchart {subchart:?} is empty after filtering, skipped");
                return None;
            }
            let frequencies = if case_insensitive {
                fold_case(frequencies)
            } else {
                frequencies
            };
            Some(SubchartResult {
                subchart,
                frequencies,
            })
        })
        .collect()
}
