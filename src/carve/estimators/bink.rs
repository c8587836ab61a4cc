//! Bink video container estimator.
//!
//! Bink headers carry an honest little-endian size field right after the
//! magic, so validation is a range check: accept anything from a minimal
//! header up to the largest video the title ships, and reject sizes that
//! run past the buffer.

use super::{read_u32_le, Accepted, BoundaryEstimator};
use crate::carve::config::CarveConfig;
use crate::core::CarveMetadata;
use tracing::debug;

/// Codec revisions seen in shipped content.
pub const MAGICS: [&[u8]; 7] = [b"BIKf", b"BIKg", b"BIKh", b"BIKi", b"KB2f", b"KB2g", b"KB2j"];

const MIN_DECLARED: u32 = 20;
const MAX_DECLARED: u32 = 500 * 1024 * 1024;

pub struct BinkEstimator;

impl BoundaryEstimator for BinkEstimator {
    fn estimate(&self, buf: &[u8], offset: usize, _cfg: &CarveConfig) -> Option<Accepted> {
        let magic = buf.get(offset..offset + 4)?;
        if !MAGICS.iter().any(|m| magic == *m) {
            return None;
        }

        // declared size excludes the 8-byte magic+size prefix
        let declared = read_u32_le(buf, offset + 4)?;
        if !(MIN_DECLARED..=MAX_DECLARED).contains(&declared) {
            debug!(offset, declared, "implausible video size, rejecting");
            return None;
        }
        let total = declared as u64 + 8;
        if offset as u64 + total > buf.len() as u64 {
            return None;
        }

        Some(Accepted {
            length: total as usize,
            confidence: 0.85,
            metadata: CarveMetadata::Video {
                declared_size: declared,
            },
        })
    }
}
