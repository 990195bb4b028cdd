//! Run statistics.

use crate::pipeline::grouping::Grouping;

/// A snapshot of what one counting run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Rows handed to the pipeline.
    pub rows_read: usize,
    /// Rows that landed in a group.
    pub rows_grouped: usize,
    /// Rows dropped for a missing grouping value.
    pub rows_missing_key: usize,
    /// Rows dropped for an unsupported language.
    pub rows_unsupported_language: usize,
    /// Groups tokenized.
    pub groups: usize,
    /// Groups whose tokenization failed.
    pub groups_failed: usize,
    /// Token occurrences counted across all groups, after filtering.
    pub tokens_counted: u64,
    /// Non-empty subcharts produced.
    pub subcharts: usize,
}

impl PipelineStats {
    /// Seeds stats with the row accounting of a grouping pass.
    pub fn from_grouping(grouping: &Grouping) -> Self {
        Self {
            rows_read: grouping.rows_read,
            rows_grouped: grouping.rows_grouped(),
            rows_missing_key: grouping.rows_missing_key,
            rows_unsupported_language: grouping.rows_unsupported,
            groups: grouping.groups.len(),
            ..Self::default()
        }
    }

    /// Rows not counted for any reason.
    pub fn rows_dropped(&self) -> usize {
        self.rows_missing_key + self.rows_unsupported_language
    }
}

impl core::fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} rows, {} groups, {} tokens, {} subcharts",
            self.rows_read, self.groups, self.tokens_counted, self.subcharts
        )?;

        if self.rows_dropped() > 0 {
            write!(
                f,
                ", dropped {} rows ({} missing key, {} unsupported language)",
                self.rows_dropped(),
                self.rows_missing_key,
                self.rows_unsupported_language
            )?;
        }
        if self.groups_failed > 0 {
            write!(f, ", {} groups failed", self.groups_failed)?;
        }

        Ok(())
    }
}
