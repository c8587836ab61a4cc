//! RIFF/WAVE audio estimator.
//!
//! The RIFF size field is trustworthy once the chunk structure checks out, so
//! the work here is structural: the WAVE form type must follow the RIFF
//! header and a bounded sub-chunk walk must reach a fmt chunk carrying one of
//! the audio format tags the engine actually ships.

use super::{read_u16_le, read_u32_le, Accepted, BoundaryEstimator};
use crate::carve::config::CarveConfig;
use crate::core::CarveMetadata;
use tracing::debug;

/// Format tags the title's audio bank is known to contain.
const KNOWN_TAGS: [u16; 7] = [
    0x0001, // PCM
    0x0002, // MS ADPCM
    0x0011, // IMA ADPCM
    0x0055, // MP3
    0x0165, // xWMA
    0x0166, // xWMA v2
    0xFFFE, // extensible
];

/// Sub-chunks walked before giving up on finding fmt.
const MAX_CHUNKS: usize = 64;

pub struct WaveEstimator;

impl BoundaryEstimator for WaveEstimator {
    fn estimate(&self, buf: &[u8], offset: usize, _cfg: &CarveConfig) -> Option<Accepted> {
        if buf.get(offset..offset + 4)? != b"RIFF" {
            return None;
        }
        let declared = read_u32_le(buf, offset + 4)?;
        let total = declared as u64 + 8;
        if offset as u64 + total > buf.len() as u64 {
            debug!(offset, declared, "riff size runs past buffer, rejecting");
            return None;
        }
        if buf.get(offset + 8..offset + 12)? != b"WAVE" {
            return None;
        }

        // Walk sub-chunks until fmt; 8-byte chunk headers, lengths padded to
        // even per RIFF.
        let end = offset + total as usize;
        let mut at = offset + 12;
        let mut format_tag: Option<u16> = None;
        for _ in 0..MAX_CHUNKS {
            if at + 8 > end {
                break;
            }
            let id = &buf[at..at + 4];
            let chunk_len = read_u32_le(buf, at + 4)? as usize;
            if id == b"fmt " {
                format_tag = read_u16_le(buf, at + 8);
                break;
            }
            at = at
                .checked_add(8)?
                .checked_add(chunk_len + (chunk_len & 1))?;
        }

        let tag = format_tag?;
        if !KNOWN_TAGS.contains(&tag) {
            debug!(offset, tag, "unrecognized audio format tag, rejecting");
            return None;
        }

        Some(Accepted {
            length: total as usize,
            confidence: 0.95,
            metadata: CarveMetadata::Audio {
                format_tag: tag,
                declared_size: declared,
            },
        })
    }
}
