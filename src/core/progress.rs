//! Cooperative cancellation and throttled progress reporting.
//!
//! Long scans and walks check the token at bounded granularity (per shard,
//! per N candidates, per M nodes) and report a monotonic fraction in [0, 1]
//! through a callback that is never fired per item.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Progress callback: monotonic fraction plus an optional phase label.
pub type ProgressFn<'a> = dyn Fn(f32, Option<&str>) + Send + Sync + 'a;

/// Shared cancellation flag. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe from any thread.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Count- and time-throttled, monotonic progress emitter.
///
/// `tick` is cheap when no callback is installed; with one installed it fires
/// at most once per `min_items` ticks and `min_interval` elapsed, plus a final
/// forced emission from `finish`.
pub struct ProgressThrottle<'a> {
    callback: Option<&'a ProgressFn<'a>>,
    phase: &'static str,
    min_items: usize,
    min_interval: Duration,
    since_emit: usize,
    last_emit: Instant,
    last_fraction: f32,
}

impl<'a> ProgressThrottle<'a> {
    pub fn new(callback: Option<&'a ProgressFn<'a>>, phase: &'static str, min_items: usize) -> Self {
        Self {
            callback,
            phase,
            min_items: min_items.max(1),
            min_interval: Duration::from_millis(100),
            since_emit: 0,
            last_emit: Instant::now(),
            last_fraction: 0.0,
        }
    }

    /// Record one unit of work at the given completion fraction.
    pub fn tick(&mut self, fraction: f32) {
        let Some(cb) = self.callback else { return };
        self.since_emit += 1;
        if self.since_emit < self.min_items || self.last_emit.elapsed() < self.min_interval {
            return;
        }
        self.since_emit = 0;
        self.last_emit = Instant::now();
        let clamped = fraction.clamp(self.last_fraction, 1.0);
        self.last_fraction = clamped;
        cb(clamped, Some(self.phase));
    }

    /// Force a final emission at 1.0.
    pub fn finish(&mut self) {
        if let Some(cb) = self.callback {
            self.last_fraction = 1.0;
            cb(1.0, Some(self.phase));
        }
    }
}
