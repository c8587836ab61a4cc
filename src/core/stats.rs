//! Running counters for a carve pass.

use crate::core::candidate::FormatId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-format outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatCounters {
    /// Candidates whose estimator accepted a region.
    pub accepted: u32,
    /// Candidates whose estimator rejected the hit.
    pub rejected: u32,
    /// Candidates skipped inside an already-accepted region.
    pub skipped_contained: u32,
    /// Candidates skipped because the per-format cap was reached.
    pub skipped_capped: u32,
}

impl FormatCounters {
    /// Total candidates seen for the format.
    pub fn total(&self) -> u32 {
        self.accepted + self.rejected + self.skipped_contained + self.skipped_capped
    }
}

/// Rollup statistics for one carve pass over one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarveStats {
    /// Counters keyed by format name (BTreeMap for stable serialization order).
    pub per_format: BTreeMap<String, FormatCounters>,
    /// Raw signature hits produced by the scanner.
    pub candidates: u64,
    /// Whether the pass was cancelled before completing.
    pub cancelled: bool,
    /// Wall time spent, in milliseconds.
    pub elapsed_ms: u64,
}

impl CarveStats {
    pub(crate) fn counters_mut(&mut self, format: FormatId) -> &mut FormatCounters {
        self.per_format.entry(format.name().to_string()).or_default()
    }

    /// Counters for a format, zeroed if no candidate of that format was seen.
    pub fn counters(&self, format: FormatId) -> FormatCounters {
        self.per_format
            .get(format.name())
            .copied()
            .unwrap_or_default()
    }

    /// Total accepted regions across formats.
    pub fn total_accepted(&self) -> u32 {
        self.per_format.values().map(|c| c.accepted).sum()
    }

    /// Total rejected candidates across formats.
    pub fn total_rejected(&self) -> u32 {
        self.per_format.values().map(|c| c.rejected).sum()
    }
}
