//! PNG image estimator.
//!
//! Interface art is stored as stock PNG; the signature is strong and the
//! terminal chunk marks the end exactly, so this is the simplest estimator:
//! find IEND within a bounded window and take everything through its CRC.

use super::{Accepted, BoundaryEstimator};
use crate::carve::config::CarveConfig;
use crate::core::CarveMetadata;
use memchr::memmem;

pub const MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

const IEND: &[u8] = b"IEND";

pub struct PngEstimator;

impl BoundaryEstimator for PngEstimator {
    fn estimate(&self, buf: &[u8], offset: usize, cfg: &CarveConfig) -> Option<Accepted> {
        if buf.get(offset..offset + MAGIC.len())? != MAGIC {
            return None;
        }

        let window_end = buf.len().min(offset + cfg.walk_limits.max_png_scan);
        let window = &buf[offset + MAGIC.len()..window_end];
        let iend = memmem::find(window, IEND)?;

        // length runs through the IEND type plus its 4-byte CRC
        let end = offset + MAGIC.len() + iend + IEND.len() + 4;
        if end > buf.len() {
            return None;
        }

        Some(Accepted {
            length: end - offset,
            confidence: 0.9,
            metadata: CarveMetadata::Png,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_png(body_len: usize) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.extend(std::iter::repeat_n(0xABu8, body_len));
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(IEND);
        out.extend_from_slice(&[0x11, 0x22, 0x33, 0x44]); // crc
        out
    }

    #[test]
    fn length_runs_through_iend_crc() {
        let mut buf = build_png(100);
        let png_len = buf.len();
        buf.extend_from_slice(&[0xEE; 32]);
        let acc = PngEstimator.estimate(&buf, 0, &CarveConfig::default()).unwrap();
        assert_eq!(acc.length, png_len);
    }

    #[test]
    fn rejects_when_no_terminal_chunk_in_window() {
        let mut cfg = CarveConfig::default();
        cfg.walk_limits.max_png_scan = 64;
        let buf = build_png(1024); // IEND beyond the 64-byte window
        assert!(PngEstimator.estimate(&buf, 0, &cfg).is_none());
    }

    #[test]
    fn rejects_crc_truncated_by_buffer_end() {
        let mut buf = build_png(16);
        buf.truncate(buf.len() - 2);
        assert!(PngEstimator.estimate(&buf, 0, &CarveConfig::default()).is_none());
    }
}
