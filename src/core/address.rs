//! Address plausibility classification.
//!
//! Pointer chasing through a partial dump rejects most candidate values
//! before ever touching the buffer: a 32-bit word that falls outside the
//! platform's heap and module windows is almost never a pointer worth
//! translating. Classification is a pure function over the full 32-bit
//! domain, with no lifecycle and no buffer access.

use serde::{Deserialize, Serialize};

/// Coarse classification of a captured 32-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressClass {
    /// Inside the platform's heap window; plausibly a data pointer.
    Heap,
    /// At or above the module window floor; plausibly a code/vtable pointer.
    Module,
    /// Neither window; not pointer-like.
    Unknown,
}

/// Platform address windows, handed over by the dump loader.
///
/// Defaults match the console title this crate targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformLayout {
    /// Inclusive start of the heap window.
    pub heap_start: u32,
    /// Exclusive end of the heap window.
    pub heap_end: u32,
    /// Inclusive floor of the module window.
    pub module_floor: u32,
}

impl Default for PlatformLayout {
    fn default() -> Self {
        Self {
            heap_start: 0x4000_0000,
            heap_end: 0x5000_0000,
            module_floor: 0x8200_0000,
        }
    }
}

impl PlatformLayout {
    /// Classify a captured 32-bit value against the platform windows.
    pub fn classify(&self, va: u32) -> AddressClass {
        if va >= self.heap_start && va < self.heap_end {
            AddressClass::Heap
        } else if va >= self.module_floor {
            AddressClass::Module
        } else {
            AddressClass::Unknown
        }
    }

    /// Whether a value looks like any kind of pointer at all.
    pub fn pointer_like(&self, va: u32) -> bool {
        self.classify(va) != AddressClass::Unknown
    }
}
