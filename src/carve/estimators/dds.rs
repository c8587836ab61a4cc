//! DDS image estimator.
//!
//! The title ships DDS surfaces in both byte orders, so the header fields are
//! decoded under each and the sane decode wins: a real header has its declared
//! struct size of 124 and dimensions within hardware limits. Length is the
//! 128-byte header plus the mip chain, block sizes derived from the fourCC.

use super::{read_u32_be, read_u32_le, Accepted, BoundaryEstimator};
use crate::carve::config::CarveConfig;
use crate::core::{CarveMetadata, HeaderEndian};
use tracing::debug;

const HEADER_LEN: usize = 128;
const DECLARED_STRUCT_SIZE: u32 = 124;
const MAX_DIM: u32 = 16384;
const MAX_MIPS: u32 = 16;

pub struct DdsEstimator;

struct DecodedHeader {
    width: u32,
    height: u32,
    mip_count: u32,
    four_cc: [u8; 4],
    rgb_bit_count: u32,
    endian: HeaderEndian,
}

impl DdsEstimator {
    fn decode(buf: &[u8], offset: usize, endian: HeaderEndian) -> Option<DecodedHeader> {
        let read = |at: usize| match endian {
            HeaderEndian::Little => read_u32_le(buf, offset + at),
            HeaderEndian::Big => read_u32_be(buf, offset + at),
        };

        if read(4)? != DECLARED_STRUCT_SIZE {
            return None;
        }
        let height = read(12)?;
        let width = read(16)?;
        if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
            return None;
        }
        let mip_count = read(28)?.clamp(1, MAX_MIPS);

        let mut four_cc: [u8; 4] = buf.get(offset + 84..offset + 88)?.try_into().ok()?;
        if endian == HeaderEndian::Big {
            // A byte-swapped header swaps the fourCC dword with it.
            four_cc.reverse();
        }
        let rgb_bit_count = read(88)?;

        Some(DecodedHeader {
            width,
            height,
            mip_count,
            four_cc,
            rgb_bit_count,
            endian,
        })
    }

    /// Bytes for one mip level, or None for an unsupported pixel format.
    fn mip_len(hdr: &DecodedHeader, level: u32) -> Option<u64> {
        let w = (hdr.width >> level).max(1) as u64;
        let h = (hdr.height >> level).max(1) as u64;
        match &hdr.four_cc {
            b"DXT1" | b"ATI1" => Some(w.div_ceil(4) * h.div_ceil(4) * 8),
            b"DXT2" | b"DXT3" | b"DXT4" | b"DXT5" | b"ATI2" => {
                Some(w.div_ceil(4) * h.div_ceil(4) * 16)
            }
            _ => match hdr.rgb_bit_count {
                8 | 16 | 24 | 32 => Some(w * h * hdr.rgb_bit_count as u64 / 8),
                _ => None,
            },
        }
    }
}

impl BoundaryEstimator for DdsEstimator {
    fn estimate(&self, buf: &[u8], offset: usize, _cfg: &CarveConfig) -> Option<Accepted> {
        if offset + HEADER_LEN > buf.len() {
            return None;
        }

        let hdr = Self::decode(buf, offset, HeaderEndian::Little)
            .or_else(|| Self::decode(buf, offset, HeaderEndian::Big))?;

        let mut total = HEADER_LEN as u64;
        for level in 0..hdr.mip_count {
            total += Self::mip_len(&hdr, level)?;
        }

        if offset as u64 + total > buf.len() as u64 {
            debug!(offset, total, "dds payload runs past buffer, rejecting");
            return None;
        }

        Some(Accepted {
            length: total as usize,
            confidence: 0.9,
            metadata: CarveMetadata::Image {
                width: hdr.width,
                height: hdr.height,
                mip_count: hdr.mip_count,
                four_cc: String::from_utf8_lossy(&hdr.four_cc).into_owned(),
                endian: hdr.endian,
            },
        })
    }
}
