//! Case normalization of frequency maps.
//!
//! Folds every casing variant of a token (`The`, `the`, `THE`) into one
//! entry. The entry is keyed by the variant with the highest count and
//! carries the sum of all variant counts.
//!
//! # Tie-break
//!
//! When two variants share the highest count, the lexicographically smallest
//! one (plain `str` ordering, so uppercase ASCII sorts first) wins. The
//! choice therefore never depends on hash-table iteration order.
//!
//! # Examples
//!
//! ```
//! use polycloud_core::analyzer::normalizer::fold_case;
//! use polycloud_core::FrequencyMap;
//!
//! let folded = fold_case(FrequencyMap::from([("The", 3), ("the", 5)]));
//! assert_eq!(folded, FrequencyMap::from([("the", 8)]));
//! ```

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::frequency::FrequencyMap;

/// Casing variants of one lowercase form. Almost always one or two.
type Variants = SmallVec<[(String, u32); 4]>;

/// Merges all casing variants of each token into a single entry.
///
/// Idempotent: folding an already folded map returns it unchanged.
pub fn fold_case(map: FrequencyMap) -> FrequencyMap {
    let mut buckets: FxHashMap<String, Variants> =
        FxHashMap::with_capacity_and_hasher(map.len(), Default::default());

    for (text, count) in map {
        buckets
            .entry(text.to_lowercase())
            .or_default()
            .push((text, count));
    }

    let mut folded = FrequencyMap::with_capacity(buckets.len());
    for variants in buckets.into_values() {
        let total = variants
            .iter()
            .fold(0u32, |acc, (_, count)| acc.saturating_add(*count));
        if let Some((surface, _)) = variants.into_iter().max_by(prefer_variant) {
            folded.add_owned(surface, total);
        }
    }
    folded
}

/// Higher count wins; on equal counts the smaller text is the greater variant.
#[inline]
fn prefer_variant(a: &(String, u32), b: &(String, u32)) -> core::cmp::Ordering {
    a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0))
}
