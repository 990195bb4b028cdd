//! Token Frequency Map
//!
//! Maps token surface text to an occurrence count. This is the unit of data
//! flowing from aggregation through combining to the render adapter.
//!
//! ## Invariants
//!
//! - Keys are unique and never the empty string
//! - Every stored count is at least 1
//!
//! Both are enforced on insertion: adding zero or adding under an empty key
//! is a no-op.
//!
//! ## Ordering
//!
//! The backing table is an `FxHashMap`, so iteration order is unspecified.
//! Anything that must be reproducible goes through [`FrequencyMap::sorted`],
//! which orders by count (descending) then text (ascending).

use rustc_hash::FxHashMap;

/// Token text to count mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    counts: FxHashMap<String, u32>,
}

impl FrequencyMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with room for `capacity` distinct tokens.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Counts one more occurrence of `text`.
    #[inline]
    pub fn increment(&mut self, text: &str) {
        self.add(text, 1);
    }

    /// Adds `count` occurrences of `text`.
    pub fn add(&mut self, text: &str, count: u32) {
        if count == 0 || text.is_empty() {
            return;
        }
        match self.counts.get_mut(text) {
            Some(existing) => *existing = existing.saturating_add(count),
            None => {
                self.counts.insert(text.to_owned(), count);
            }
        }
    }

    /// Adds `count` occurrences of an owned `text`, avoiding a copy on insert.
    pub fn add_owned(&mut self, text: String, count: u32) {
        if count == 0 || text.is_empty() {
            return;
        }
        let entry = self.counts.entry(text).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Sums every count of `other` into `self`.
    pub fn merge(&mut self, other: FrequencyMap) {
        if self.counts.is_empty() {
            self.counts = other.counts;
            return;
        }
        for (text, count) in other.counts {
            self.add_owned(text, count);
        }
    }

    /// Returns the count of `text`, if present.
    #[inline]
    pub fn get(&self, text: &str) -> Option<u32> {
        self.counts.get(text).copied()
    }

    /// Number of distinct tokens.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if no token was counted.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    /// Iterates over `(text, count)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// All entries, count descending then text ascending.
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> = self.iter().collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// The `n` most frequent entries, in [`sorted`](Self::sorted) order.
    pub fn top(&self, n: usize) -> Vec<(&str, u32)> {
        let mut entries = self.sorted();
        entries.truncate(n);
        entries
    }
}

impl<K: AsRef<str>> FromIterator<(K, u32)> for FrequencyMap {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        let mut map = FrequencyMap::new();
        for (text, count) in iter {
            map.add(text.as_ref(), count);
        }
        map
    }
}

impl<K: AsRef<str>, const N: usize> From<[(K, u32); N]> for FrequencyMap {
    fn from(entries: [(K, u32); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for FrequencyMap {
    type Item = (String, u32);
    type IntoIter = std::collections::hash_map::IntoIter<String, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}
