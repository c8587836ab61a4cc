//! Bounded struct reads over a captured snapshot.
//!
//! A `Snapshot` bundles the dump buffer with its region table and platform
//! layout. Every read takes a virtual address, resolves it through the
//! translator, and fails soft: `None` for unmapped, truncated, or otherwise
//! unreadable locations, which is the expected common case when chasing
//! pointers through a partial dump. Multi-byte fields are console byte order
//! (big-endian).

use crate::core::{AddressClass, PlatformLayout, RegionMap};

/// A read-only view of one captured address space.
pub struct Snapshot<'a> {
    buf: &'a [u8],
    regions: &'a RegionMap,
    layout: PlatformLayout,
}

impl<'a> Snapshot<'a> {
    pub fn new(buf: &'a [u8], regions: &'a RegionMap, layout: PlatformLayout) -> Self {
        Self {
            buf,
            regions,
            layout,
        }
    }

    pub fn layout(&self) -> &PlatformLayout {
        &self.layout
    }

    /// Classify a captured value without touching the buffer.
    pub fn classify(&self, va: u32) -> AddressClass {
        self.layout.classify(va)
    }

    /// Read exactly `len` bytes at `va`, requiring the whole span to be
    /// mapped inside one region and inside the buffer.
    pub fn read_bytes(&self, va: u32, len: usize) -> Option<&'a [u8]> {
        let offset = self.regions.va_to_offset_checked(va, len, self.buf.len())?;
        self.buf.get(offset..offset + len)
    }

    /// Read up to `max` bytes at `va`, clamped to what the containing region
    /// and buffer actually hold.
    pub fn read_bytes_up_to(&self, va: u32, max: usize) -> Option<&'a [u8]> {
        let offset = self.regions.va_to_offset(va)?;
        let region = self.regions.region_containing(va)?;
        let in_region = (region.va_end() - va as u64) as usize;
        let avail = max.min(in_region).min(self.buf.len().saturating_sub(offset));
        if avail == 0 {
            return None;
        }
        self.buf.get(offset..offset + avail)
    }

    pub fn read_u8(&self, va: u32) -> Option<u8> {
        self.read_bytes(va, 1).map(|b| b[0])
    }

    pub fn read_u16(&self, va: u32) -> Option<u16> {
        Some(u16::from_be_bytes(self.read_bytes(va, 2)?.try_into().ok()?))
    }

    pub fn read_u32(&self, va: u32) -> Option<u32> {
        Some(u32::from_be_bytes(self.read_bytes(va, 4)?.try_into().ok()?))
    }

    pub fn read_f32(&self, va: u32) -> Option<f32> {
        self.read_u32(va).map(f32::from_bits)
    }

    /// Read a NUL-terminated printable-ASCII string of at most `max_len`
    /// bytes at `va`. Unterminated or non-printable data reads as nothing.
    pub fn read_cstring(&self, va: u32, max_len: usize) -> Option<String> {
        let window = self.read_bytes_up_to(va, max_len.saturating_add(1))?;
        let nul = window.iter().position(|&b| b == 0)?;
        if nul == 0 || nul > max_len {
            return None;
        }
        let bytes = &window[..nul];
        if !bytes.iter().all(|&b| (0x20..=0x7E).contains(&b)) {
            return None;
        }
        Some(String::from_utf8_lossy(bytes).into_owned())
    }
}
