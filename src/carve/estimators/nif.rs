//! Gamebryo model container estimator.
//!
//! The header is a text magic plus a version string; the container itself
//! records no trustworthy total size, so length is a block-count probe in a
//! small window after the header, with a fixed fallback when the probe finds
//! nothing plausible. Model regions are carved generously and trimmed by the
//! downstream pipeline.

use super::{read_u32_be, read_u32_le, Accepted, BoundaryEstimator};
use crate::carve::config::CarveConfig;
use crate::core::CarveMetadata;
use tracing::debug;

pub const MAGIC: &[u8] = b"Gamebryo File Format, Version ";

/// Version families the engine shipped.
const ACCEPTED_FAMILIES: [&str; 4] = ["10.", "20.0", "20.1", "20.2"];

/// Longest version token read after the magic.
const MAX_VERSION_LEN: usize = 48;

/// Post-version window probed for a plausible block count.
const PROBE_WINDOW: usize = 64;
const MAX_BLOCK_COUNT: u32 = 4096;

/// Nominal per-block size estimate used to scale the probe result.
const BLOCK_SIZE_ESTIMATE: usize = 2048;

/// Length used when the probe finds nothing plausible.
const FALLBACK_LEN: usize = 512 * 1024;

pub struct NifEstimator;

impl BoundaryEstimator for NifEstimator {
    fn estimate(&self, buf: &[u8], offset: usize, _cfg: &CarveConfig) -> Option<Accepted> {
        let after_magic = offset + MAGIC.len();
        if buf.get(offset..after_magic)? != MAGIC {
            return None;
        }

        // Version token: digits and dots, terminated by NUL or a line break.
        let window = buf.get(after_magic..buf.len().min(after_magic + MAX_VERSION_LEN))?;
        let term = window
            .iter()
            .position(|&b| b == 0 || b == b'\n' || b == b'\r')?;
        if term == 0 {
            return None;
        }
        let token = &window[..term];
        if !token.iter().all(|&b| b.is_ascii_digit() || b == b'.') {
            return None;
        }
        let version = std::str::from_utf8(token).ok()?.to_string();
        if !ACCEPTED_FAMILIES.iter().any(|f| version.starts_with(f)) {
            debug!(offset, %version, "model version outside accepted families");
            return None;
        }

        // Block-count probe: a u32 in either byte order, plausible as a block
        // count, anywhere in a small window after the version terminator.
        let probe_start = after_magic + term + 1;
        let probe_end = buf.len().min(probe_start + PROBE_WINDOW);
        let mut block_count: Option<u32> = None;
        let mut at = probe_start;
        while at + 4 <= probe_end {
            for v in [read_u32_le(buf, at), read_u32_be(buf, at)].into_iter().flatten() {
                if (1..=MAX_BLOCK_COUNT).contains(&v) {
                    block_count = Some(v);
                    break;
                }
            }
            if block_count.is_some() {
                break;
            }
            at += 4;
        }

        let est = match block_count {
            Some(n) => probe_start + n as usize * BLOCK_SIZE_ESTIMATE,
            None => FALLBACK_LEN,
        };
        let length = est.min(buf.len() - offset);
        if length <= MAGIC.len() + term {
            return None;
        }

        Some(Accepted {
            length,
            confidence: if block_count.is_some() { 0.6 } else { 0.4 },
            metadata: CarveMetadata::Model {
                version,
                block_count,
            },
        })
    }
}
