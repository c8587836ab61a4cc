//! Boundary estimation: one validator/measurer per carvable format.
//!
//! An estimator receives a raw signature hit and either rejects it or accepts
//! a bounded region. Cheap structural header checks come first and throw out
//! the bulk of false-positive magic matches before anything derived from the
//! header is trusted. Estimators never read outside the buffer and never
//! return errors; a failed check is a rejection and scanning moves on.

pub mod bink;
pub mod bytecode;
pub mod dds;
pub mod nif;
pub mod png;
pub mod script;
pub mod tiled;
pub mod wave;

pub use bink::BinkEstimator;
pub use bytecode::BytecodeEstimator;
pub use dds::DdsEstimator;
pub use nif::NifEstimator;
pub use png::PngEstimator;
pub use script::ScriptEstimator;
pub use tiled::TiledTextureEstimator;
pub use wave::WaveEstimator;

use crate::carve::config::CarveConfig;
use crate::core::CarveMetadata;

/// A validated region with its accepted length.
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted {
    /// Accepted byte length from the candidate offset; > 0 and in-bounds.
    pub length: usize,
    /// Confidence in [0.0, 1.0].
    pub confidence: f32,
    /// Header fields recovered during validation.
    pub metadata: CarveMetadata,
}

/// Per-format validation and length computation.
///
/// Implementations are pure functions of `(buffer, offset, config)` with no
/// shared mutable state, so independent candidates can be estimated
/// concurrently.
pub trait BoundaryEstimator: Send + Sync {
    /// Validate the candidate at `offset` and compute its length, or reject
    /// it by returning `None`. Work per call is bounded except where a
    /// forward search is part of the algorithm.
    fn estimate(&self, buf: &[u8], offset: usize, cfg: &CarveConfig) -> Option<Accepted>;
}

// Bounded little/big-endian field reads. All return None past the buffer end
// rather than panicking; estimators treat that as a truncated header.

pub(crate) fn read_u16_le(buf: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_le_bytes(buf.get(at..at + 2)?.try_into().ok()?))
}

pub(crate) fn read_u32_le(buf: &[u8], at: usize) -> Option<u32> {
    Some(u32::from_le_bytes(buf.get(at..at + 4)?.try_into().ok()?))
}

pub(crate) fn read_u32_be(buf: &[u8], at: usize) -> Option<u32> {
    Some(u32::from_be_bytes(buf.get(at..at + 4)?.try_into().ok()?))
}
