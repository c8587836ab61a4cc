//! Configuration for the carving pipeline.
//!
//! The boundary-search ratios and margins were tuned against one specific
//! content mix; they are deliberately configuration, not constants, and the
//! defaults here should be re-validated before reuse on other titles.

use serde::{Deserialize, Serialize};

/// Master configuration for a carve pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarveConfig {
    /// Per-format acceptance caps.
    pub caps: CapConfig,
    /// Compressed-payload boundary search tuning.
    pub boundary: BoundaryConfig,
    /// Text and bytecode walk limits.
    pub walk_limits: WalkLimitConfig,
    /// Progress/cancellation granularity.
    pub pacing: PacingConfig,
}

/// Per-format acceptance caps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapConfig {
    /// Maximum accepted regions per format; further candidates of a capped
    /// format are skipped while other formats continue.
    pub per_format: u32,
}

impl Default for CapConfig {
    fn default() -> Self {
        Self { per_format: 1000 }
    }
}

/// Tuning for the compressed-texture boundary search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// Minimum plausible compressed/uncompressed ratio; the search window
    /// opens at this fraction of the uncompressed size.
    pub min_ratio: f64,
    /// Ratio assumed when no successor header validates in-window.
    pub fallback_ratio: f64,
    /// Slack past the uncompressed size closing the search window, in bytes.
    pub window_slack: usize,
    /// Margin added past a validated successor to keep legitimate trailing
    /// sub-chunks, in bytes.
    pub overlap_margin: usize,
    /// Absolute floor for any compressed-size estimate, in bytes.
    pub compressed_floor: usize,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            min_ratio: 0.40,
            fallback_ratio: 0.70,
            window_slack: 64 * 1024,
            overlap_margin: 32 * 1024,
            compressed_floor: 4096,
        }
    }
}

/// Bounds on the text/bytecode estimators' forward walks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkLimitConfig {
    /// Longest accepted script source, in bytes.
    pub max_script_len: usize,
    /// Statement budget for one bytecode candidate.
    pub max_statements: usize,
    /// Longest forward search for a PNG terminal chunk, in bytes.
    pub max_png_scan: usize,
}

impl Default for WalkLimitConfig {
    fn default() -> Self {
        Self {
            max_script_len: 64 * 1024,
            max_statements: 4096,
            max_png_scan: 16 * 1024 * 1024,
        }
    }
}

/// Cancellation-check and progress-callback granularity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Candidates between cancellation checks.
    pub cancel_every: usize,
    /// Minimum candidates between progress callbacks.
    pub progress_every: usize,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            cancel_every: 64,
            progress_every: 256,
        }
    }
}
