//! The captured region table and virtual-address translation.
//!
//! The dump loader hands over an ordered list of memory regions; from then on
//! the table is immutable and every pointer chase resolves through it. Module
//! space on the console has the high bit set, and the loader's 64-bit fields
//! store those addresses sign-extended, so raw entries are normalized to
//! native 32-bit unsigned values before the table is built.

use crate::error::{Result, ScathaError};
use serde::{Deserialize, Serialize};

/// One captured region: a contiguous VA range backed by bytes in the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRegion {
    /// First virtual address of the region.
    pub va_start: u32,
    /// Region length in bytes.
    pub size: u32,
    /// Offset of the region's first byte inside the dump buffer.
    pub file_offset: u64,
}

impl MemoryRegion {
    /// Exclusive end of the region in VA space.
    pub fn va_end(&self) -> u64 {
        self.va_start as u64 + self.size as u64
    }

    /// Whether the region contains the address.
    pub fn contains(&self, va: u32) -> bool {
        (va as u64) >= self.va_start as u64 && (va as u64) < self.va_end()
    }
}

/// Immutable, sorted, non-overlapping region table with binary-search lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionMap {
    regions: Vec<MemoryRegion>,
}

impl RegionMap {
    /// Build a map from loader output, validating the table invariants.
    pub fn new(mut regions: Vec<MemoryRegion>) -> Result<Self> {
        regions.sort_by_key(|r| r.va_start);
        for pair in regions.windows(2) {
            if (pair[1].va_start as u64) < pair[0].va_end() {
                return Err(ScathaError::InvalidRegionTable(format!(
                    "regions overlap at {:#010x}",
                    pair[1].va_start
                )));
            }
        }
        Ok(Self { regions })
    }

    /// Build a map from the loader's raw 64-bit descriptor fields.
    ///
    /// Module-space addresses arrive sign-extended; truncation to u32 recovers
    /// the address the process actually saw.
    pub fn from_raw(raw: impl IntoIterator<Item = (u64, u64, u64)>) -> Result<Self> {
        let regions = raw
            .into_iter()
            .map(|(va, size, file_offset)| MemoryRegion {
                va_start: va as u32,
                size: size as u32,
                file_offset,
            })
            .collect();
        Self::new(regions)
    }

    /// The regions in ascending VA order.
    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    /// The region containing an address, if any.
    pub fn region_containing(&self, va: u32) -> Option<&MemoryRegion> {
        let idx = self.regions.partition_point(|r| r.va_start <= va);
        if idx == 0 {
            return None;
        }
        let region = &self.regions[idx - 1];
        region.contains(va).then_some(region)
    }

    /// Translate a virtual address to a dump-buffer offset.
    ///
    /// Returns `None` for any address outside the captured regions; during
    /// pointer chasing that is the expected common case, not an error.
    pub fn va_to_offset(&self, va: u32) -> Option<usize> {
        let idx = self.regions.partition_point(|r| r.va_start <= va);
        if idx == 0 {
            return None;
        }
        let region = &self.regions[idx - 1];
        if !region.contains(va) {
            return None;
        }
        Some((region.file_offset + (va - region.va_start) as u64) as usize)
    }

    /// Translate an address and require `len` readable bytes at it.
    ///
    /// Rejects reads that would cross the end of the containing region or the
    /// end of the buffer.
    pub fn va_to_offset_checked(&self, va: u32, len: usize, buf_len: usize) -> Option<usize> {
        let idx = self.regions.partition_point(|r| r.va_start <= va);
        if idx == 0 {
            return None;
        }
        let region = &self.regions[idx - 1];
        if !region.contains(va) {
            return None;
        }
        let span_end = va as u64 + len as u64;
        if span_end > region.va_end() {
            return None;
        }
        let offset = region.file_offset + (va - region.va_start) as u64;
        if offset + len as u64 > buf_len as u64 {
            return None;
        }
        Some(offset as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> RegionMap {
        RegionMap::new(vec![
            MemoryRegion {
                va_start: 0x4000_0000,
                size: 0x1000,
                file_offset: 0,
            },
            MemoryRegion {
                va_start: 0x4000_2000,
                size: 0x1000,
                file_offset: 0x1000,
            },
        ])
        .unwrap()
    }

    #[test]
    fn translates_inside_regions() {
        let map = sample_map();
        assert_eq!(map.va_to_offset(0x4000_0000), Some(0));
        assert_eq!(map.va_to_offset(0x4000_0FFF), Some(0xFFF));
        assert_eq!(map.va_to_offset(0x4000_2010), Some(0x1010));
    }

    #[test]
    fn unmapped_in_gaps_and_outside() {
        let map = sample_map();
        assert_eq!(map.va_to_offset(0x3FFF_FFFF), None);
        assert_eq!(map.va_to_offset(0x4000_1000), None);
        assert_eq!(map.va_to_offset(0x4000_1FFF), None);
        assert_eq!(map.va_to_offset(0x4000_3000), None);
    }

    #[test]
    fn checked_translation_honors_region_and_buffer_bounds() {
        let map = sample_map();
        assert_eq!(map.va_to_offset_checked(0x4000_0FF0, 16, 0x2000), Some(0xFF0));
        // read would cross the region end
        assert_eq!(map.va_to_offset_checked(0x4000_0FF0, 17, 0x2000), None);
        // read would cross the buffer end
        assert_eq!(map.va_to_offset_checked(0x4000_2800, 0x900, 0x2000), None);
    }

    #[test]
    fn sign_extended_module_addresses_normalize() {
        let map = RegionMap::from_raw([(0xFFFF_FFFF_8200_0000u64, 0x1000, 0x40)]).unwrap();
        assert_eq!(map.va_to_offset(0x8200_0004), Some(0x44));
        assert_eq!(map.va_to_offset(0x8200_1000), None);
    }

    #[test]
    fn overlapping_regions_rejected() {
        let err = RegionMap::new(vec![
            MemoryRegion {
                va_start: 0x4000_0000,
                size: 0x2000,
                file_offset: 0,
            },
            MemoryRegion {
                va_start: 0x4000_1000,
                size: 0x1000,
                file_offset: 0x2000,
            },
        ]);
        assert!(err.is_err());
    }
}
