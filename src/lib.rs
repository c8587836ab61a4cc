//! scatha: signature-based asset carving and runtime structure recovery
//! from console memory dumps.
//!
//! The crate recovers structured game data from an unstructured byte image:
//! a raw asset file, or a full process-memory snapshot captured from a
//! big-endian console title. Two subsystems share one read-only buffer and
//! one virtual-address translator:
//!
//! - [`carve`]: finds and bounds candidate files by signature, with one
//!   boundary estimator per format, overlap resolution, per-format caps,
//!   and a serializable report.
//! - [`walk`]: reconstructs native hash-table and linked-chain structures
//!   straight out of the snapshot, guided by known layouts and
//!   address-range plausibility.
//!
//! Recovery is heuristic: bad candidates and dead pointers are counted and
//! skipped, never raised, and passes always complete over corrupt or
//! adversarial input, possibly with empty results.

/// Core data types: regions, addresses, candidates, results, progress.
pub mod core;

/// Carving pipeline: scanner, estimators, registry, orchestrator.
pub mod carve;

/// Error types; only environment faults are errors here.
pub mod error;

/// Read-only mapped views over dump files.
pub mod io;

/// Tracing initialization.
pub mod logging;

/// The serializable carve report artifact.
pub mod report;

/// One-pass multi-pattern signature scanning.
pub mod scan;

/// Runtime struct walking over a captured snapshot.
pub mod walk;

pub use carve::{CarveConfig, Carver};
pub use crate::core::{
    AddressClass, CancelToken, CandidateHit, CarveMetadata, CarveStats, CarvedRegion, FormatId,
    MemoryRegion, PlatformLayout, RegionMap,
};
pub use error::{Result, ScathaError};
pub use io::MappedDump;
pub use report::CarveReport;
pub use scan::SignatureScanner;
pub use walk::{walk_hash_table, CStringReader, Snapshot, WalkOptions, WalkSummary};
