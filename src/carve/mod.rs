//! Carving pipeline: scan, estimate, resolve, report.
//!
//! The orchestrator drives the one-pass signature scan, dispatches every hit
//! to its format's boundary estimator in ascending-offset order, resolves
//! overlaps against the accepted cover, enforces per-format caps, and
//! accumulates all mutable state (counters, accepted list) as the single
//! owner. The scan/carve pass always completes, possibly with zero accepted
//! regions; bad candidates are counted, never raised.

pub mod config;
pub mod estimators;
pub mod registry;

pub use config::CarveConfig;
pub use registry::{FormatRegistry, FormatSpec, REGISTRY};

use crate::core::{CancelToken, CarveStats, CarvedRegion, ProgressFn, ProgressThrottle};
use crate::report::CarveReport;
use crate::scan::SignatureScanner;
use sha2::{Digest, Sha256};
use std::time::Instant;
use tracing::{debug, info};

/// Carving orchestrator. Construct once, reuse across buffers; the scanner
/// automaton is built here, not per pass.
pub struct Carver {
    registry: &'static FormatRegistry,
    scanner: SignatureScanner,
    config: CarveConfig,
}

impl Default for Carver {
    fn default() -> Self {
        Self::new(CarveConfig::default())
    }
}

impl Carver {
    pub fn new(config: CarveConfig) -> Self {
        Self::with_registry(&REGISTRY, config)
    }

    pub fn with_registry(registry: &'static FormatRegistry, config: CarveConfig) -> Self {
        Self {
            registry,
            scanner: registry.scanner(),
            config,
        }
    }

    pub fn config(&self) -> &CarveConfig {
        &self.config
    }

    /// Carve one immutable buffer.
    ///
    /// Deterministic for a given buffer and config. Cancellation yields the
    /// regions accepted so far with `stats.cancelled` set.
    pub fn carve(
        &self,
        buf: &[u8],
        cancel: &CancelToken,
        progress: Option<&ProgressFn<'_>>,
    ) -> CarveReport {
        let started = Instant::now();
        let mut stats = CarveStats::default();
        let mut regions: Vec<CarvedRegion> = Vec::new();

        if let Some(cb) = progress {
            cb(0.0, Some("scan"));
        }
        let hits = self.scanner.scan(buf, cancel);
        stats.candidates = hits.len() as u64;
        debug!(candidates = hits.len(), "dispatching candidates to estimators");

        let mut throttle =
            ProgressThrottle::new(progress, "carve", self.config.pacing.progress_every);
        // Exclusive end of the accepted cover; candidates opening under it sit
        // inside an accepted region of at least that extent.
        let mut cover_end: usize = 0;

        for (i, hit) in hits.iter().enumerate() {
            if i % self.config.pacing.cancel_every == 0 && cancel.is_cancelled() {
                stats.cancelled = true;
                break;
            }
            if !buf.is_empty() {
                throttle.tick(hit.offset as f32 / buf.len() as f32);
            }

            let counters = stats.counters_mut(hit.format);
            if counters.accepted >= self.config.caps.per_format {
                counters.skipped_capped += 1;
                continue;
            }
            if hit.offset < cover_end {
                counters.skipped_contained += 1;
                continue;
            }

            let spec = self.registry.spec(hit.format);
            match spec.estimator.estimate(buf, hit.offset, &self.config) {
                Some(acc) => {
                    debug_assert!(acc.length > 0);
                    debug_assert!(hit.offset + acc.length <= buf.len());
                    stats.counters_mut(hit.format).accepted += 1;
                    cover_end = cover_end.max(hit.offset + acc.length);
                    regions.push(CarvedRegion {
                        offset: hit.offset,
                        length: acc.length,
                        format: hit.format,
                        confidence: acc.confidence,
                        metadata: acc.metadata,
                        sha256: Some(digest(&buf[hit.offset..hit.offset + acc.length])),
                    });
                }
                None => {
                    stats.counters_mut(hit.format).rejected += 1;
                }
            }
        }

        throttle.finish();
        stats.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            accepted = stats.total_accepted(),
            rejected = stats.total_rejected(),
            cancelled = stats.cancelled,
            elapsed_ms = stats.elapsed_ms,
            "carve pass complete"
        );

        CarveReport::new(buf.len(), regions, stats)
    }
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
