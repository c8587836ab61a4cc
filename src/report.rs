//! The carve report artifact handed to the extraction pipeline.

use crate::core::{CarveStats, CarvedRegion};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output schema version for stability tracking.
pub const SCHEMA_VERSION: &str = "scatha.carve/1";

/// Everything one carve pass produced, in a serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarveReport {
    pub schema_version: String,
    pub created_at: DateTime<Utc>,
    /// Length of the carved buffer, for sanity-checking offsets downstream.
    pub buffer_len: usize,
    /// Accepted regions in ascending offset order.
    pub regions: Vec<CarvedRegion>,
    pub stats: CarveStats,
}

impl CarveReport {
    pub fn new(buffer_len: usize, regions: Vec<CarvedRegion>, stats: CarveStats) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            created_at: Utc::now(),
            buffer_len,
            regions,
            stats,
        }
    }

    /// Serialize for hand-off or archival.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
