//! Error types for the scatha carving and recovery library.
//!
//! Per-candidate and per-node failures (bad magic, truncated structures,
//! unmapped pointers, cycles) are never represented here: they are absorbed
//! into skip decisions at the point of discovery. This module only covers the
//! faults that must abort an operation outright.

use thiserror::Error;

/// Main error type for scatha operations.
#[derive(Debug, Error)]
pub enum ScathaError {
    /// The mapped view or its backing file failed; the environment is broken,
    /// not the input data.
    #[error("backing store failure: {0}")]
    BackingStore(#[from] std::io::Error),

    /// The region table handed over by the loader violates its invariants
    /// (overlapping or unsorted regions).
    #[error("invalid region table: {0}")]
    InvalidRegionTable(String),

    /// Serialization of a result artifact failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for scatha operations.
pub type Result<T> = std::result::Result<T, ScathaError>;
