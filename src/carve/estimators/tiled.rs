//! Proprietary tiled-texture estimator.
//!
//! The container records its uncompressed mip-chain size implicitly in the
//! packed dimension word but never the compressed payload length, so the end
//! of a texture has to be found, not read. The search derives a plausible
//! compressed-size window from the uncompressed size, looks for the next
//! same-format signature inside that window, and only trusts a successor that
//! itself passes full header validation; a configured overlap margin keeps
//! legitimate trailing sub-chunks with the region. With no validated
//! successor the estimate falls back to a fixed ratio of the uncompressed
//! size.

use super::{read_u32_be, Accepted, BoundaryEstimator};
use crate::carve::config::CarveConfig;
use crate::core::{BoundaryKind, CarveMetadata};
use bitflags::bitflags;
use memchr::memmem;
use tracing::debug;

/// Container magic variants; both revisions share one layout.
pub const MAGICS: [&[u8]; 2] = [b"XTD0", b"XTD1"];

const HEADER_LEN: usize = 68;
const MIN_VERSION: u32 = 3;
const MAX_VERSION: u32 = 0x7F;
const MAX_DIM: u32 = 4096;
const MAX_MIPS: u32 = 13;

bitflags! {
    /// Header flag word. Only the tiled bit participates in validation; the
    /// low bits vary freely across shipped content.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TextureFlags: u32 {
        const TILED = 0x8000_0000;
        const HAS_MIPS = 0x0000_0002;
        const SRGB = 0x0000_0004;
    }
}

pub struct TiledTextureEstimator;

struct TiledHeader {
    version: u32,
    width: u32,
    height: u32,
    mip_count: u32,
}

impl TiledHeader {
    /// Uncompressed mip-chain size: 8-byte 4x4 blocks, dims halved per level.
    fn uncompressed_size(&self) -> u64 {
        (0..self.mip_count)
            .map(|level| {
                let w = (self.width >> level).max(1) as u64;
                let h = (self.height >> level).max(1) as u64;
                w.div_ceil(4) * h.div_ceil(4) * 8
            })
            .sum()
    }
}

fn validate_header(buf: &[u8], offset: usize) -> Option<TiledHeader> {
    if offset + HEADER_LEN > buf.len() {
        return None;
    }
    if !MAGICS.iter().any(|m| &buf[offset..offset + 4] == *m) {
        return None;
    }

    let version = read_u32_be(buf, offset + 4)?;
    if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
        return None;
    }

    let flags = TextureFlags::from_bits_retain(read_u32_be(buf, offset + 8)?);
    if !flags.contains(TextureFlags::TILED) {
        return None;
    }

    let packed = read_u32_be(buf, offset + 12)?;
    let width = (packed & 0x1FFF) + 1;
    let height = ((packed >> 13) & 0x1FFF) + 1;
    let mip_count = ((packed >> 26) & 0xF) + 1;
    if width > MAX_DIM || height > MAX_DIM || mip_count > MAX_MIPS {
        return None;
    }

    Some(TiledHeader {
        version,
        width,
        height,
        mip_count,
    })
}

impl BoundaryEstimator for TiledTextureEstimator {
    fn estimate(&self, buf: &[u8], offset: usize, cfg: &CarveConfig) -> Option<Accepted> {
        let hdr = validate_header(buf, offset)?;
        let uncompressed = hdr.uncompressed_size();
        let b = &cfg.boundary;

        let min_est = (b.compressed_floor as u64).max((uncompressed as f64 * b.min_ratio) as u64);
        let window_start = (offset as u64 + HEADER_LEN as u64 + min_est).min(buf.len() as u64) as usize;
        let window_end = (offset as u64 + HEADER_LEN as u64 + uncompressed + b.window_slack as u64)
            .min(buf.len() as u64) as usize;

        // Scan the window for the next same-format signature; a hit only
        // bounds this texture if it fully validates as a header itself.
        let mut successor: Option<usize> = None;
        if window_start < window_end {
            let window = &buf[window_start..window_end];
            let mut positions: Vec<usize> = MAGICS
                .iter()
                .flat_map(|m| memmem::find_iter(window, m).collect::<Vec<_>>())
                .map(|p| window_start + p)
                .collect();
            positions.sort_unstable();
            successor = positions
                .into_iter()
                .find(|&p| validate_header(buf, p).is_some());
        }

        let (length, boundary, confidence) = match successor {
            Some(k) => {
                let len = (k - offset + b.overlap_margin).min(buf.len() - offset);
                (len, BoundaryKind::NextHeader, 0.8)
            }
            None => {
                let est = HEADER_LEN as u64
                    + min_est.max((uncompressed as f64 * b.fallback_ratio) as u64);
                let len = est.min((buf.len() - offset) as u64) as usize;
                if len <= HEADER_LEN {
                    debug!(offset, "tiled texture has no room past header, rejecting");
                    return None;
                }
                (len, BoundaryKind::RatioFallback, 0.5)
            }
        };

        Some(Accepted {
            length,
            confidence,
            metadata: CarveMetadata::TiledTexture {
                width: hdr.width,
                height: hdr.height,
                mip_count: hdr.mip_count,
                version: hdr.version,
                uncompressed_size: uncompressed,
                boundary,
            },
        })
    }
}
