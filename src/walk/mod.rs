//! Runtime struct walking: recovering native data structures from a snapshot.
//!
//! The game keeps some values only in memory, never in an on-disk record; the
//! walker reads them back out of a captured snapshot using known struct
//! layouts and address-range plausibility, with no cooperating runtime. The
//! table being walked may be stale, partially paged out, or corrupted, so
//! every pointer is vetted before dereference, every chain carries a
//! call-local visited set to survive cycles, and the result is an explicitly
//! bounded, best-effort summary rather than a guaranteed enumeration.

pub mod snapshot;

pub use snapshot::Snapshot;

use crate::core::{AddressClass, CancelToken, ProgressFn, ProgressThrottle};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::RangeInclusive;
use tracing::{debug, trace};

/// Declared bucket counts outside this range mean the table header is junk
/// or the table was never populated.
const BUCKET_RANGE: RangeInclusive<u32> = 2..=1_000_000;

/// Fixed hash-table header: vtable, bucket count, bucket array, element count.
const TABLE_HEADER_LEN: usize = 16;

/// Fixed chain node: next pointer, payload pointer.
const NODE_LEN: usize = 8;

/// Bounds for one walk call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkOptions {
    /// Maximum entries extracted across the whole table.
    pub max_entries: usize,
    /// Maximum extracted values retained in the summary.
    pub max_samples: usize,
    /// Longest payload string read.
    pub max_string_len: usize,
    /// Nodes between cancellation checks.
    pub cancel_every: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_entries: 4096,
            max_samples: 64,
            max_string_len: 260,
            cancel_every: 256,
        }
    }
}

/// Best-effort result of one hash-table walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkSummary<V = String> {
    /// False when the declared bucket count was implausible; nothing was read.
    pub populated: bool,
    pub declared_buckets: u32,
    pub declared_count: u32,
    /// Entries whose payload actually extracted.
    pub extracted: u32,
    /// Capped sample of extracted values.
    pub samples: Vec<V>,
    /// True when the extraction cap ended the walk early.
    pub truncated: bool,
    /// Chains cut by the visited set.
    pub cycles: u32,
    /// Pointers rejected by classification or translation.
    pub dead_links: u32,
}

// Manual impl: the derive would demand V: Default, which payload values
// need not provide.
impl<V> Default for WalkSummary<V> {
    fn default() -> Self {
        Self {
            populated: false,
            declared_buckets: 0,
            declared_count: 0,
            extracted: 0,
            samples: Vec::new(),
            truncated: false,
            cycles: 0,
            dead_links: 0,
        }
    }
}

/// Converts a validated payload pointer into a value.
///
/// Readers are subject to the same mapped/in-bounds rules as every other
/// snapshot access; a failed read skips the entry, nothing more.
pub trait PayloadReader {
    type Value;
    fn read(&self, snap: &Snapshot<'_>, payload_va: u32) -> Option<Self::Value>;
}

/// Reads the payload as a pointer to a bounded NUL-terminated ASCII string.
pub struct CStringReader {
    pub max_len: usize,
}

impl PayloadReader for CStringReader {
    type Value = String;
    fn read(&self, snap: &Snapshot<'_>, payload_va: u32) -> Option<String> {
        snap.read_cstring(payload_va, self.max_len)
    }
}

/// Look-alike check for a typed struct header at `va`.
///
/// A live object of the expected type leads with a vtable pointer into module
/// space; when the layout declares a type-tag byte, that must match too.
/// Mismatch rejects the read, it never raises.
pub fn header_trusted(snap: &Snapshot<'_>, va: u32, expected_tag: Option<(u32, u8)>) -> bool {
    let Some(vtable) = snap.read_u32(va) else {
        return false;
    };
    if snap.classify(vtable) != AddressClass::Module {
        return false;
    }
    match expected_tag {
        Some((offset, want)) => snap.read_u8(va.wrapping_add(offset)) == Some(want),
        None => true,
    }
}

/// Walk a native hash table at `table_va`, extracting payloads with `reader`.
///
/// Returns `None` when the header itself is unreadable or fails the
/// look-alike check; a readable header with an implausible bucket count
/// returns a not-populated summary instead.
pub fn walk_hash_table<R: PayloadReader>(
    snap: &Snapshot<'_>,
    table_va: u32,
    reader: &R,
    opts: &WalkOptions,
    cancel: &CancelToken,
    progress: Option<&ProgressFn<'_>>,
) -> Option<WalkSummary<R::Value>> {
    // Precondition: the full fixed header must be mapped and in-bounds.
    snap.read_bytes(table_va, TABLE_HEADER_LEN)?;
    if !header_trusted(snap, table_va, None) {
        debug!("table header at {table_va:#010x} failed trust check");
        return None;
    }

    let declared_buckets = snap.read_u32(table_va + 4)?;
    let buckets_ptr = snap.read_u32(table_va + 8)?;
    let declared_count = snap.read_u32(table_va + 12)?;

    let mut summary = WalkSummary {
        populated: true,
        declared_buckets,
        declared_count,
        ..Default::default()
    };

    if !BUCKET_RANGE.contains(&declared_buckets) {
        debug!(declared_buckets, "bucket count implausible, reporting unpopulated");
        summary.populated = false;
        return Some(summary);
    }

    // Call-local visited set; never shared across walks.
    let mut visited: HashSet<u32> = HashSet::new();
    let mut steps: usize = 0;
    let mut throttle = ProgressThrottle::new(progress, "walk", opts.cancel_every);

    'buckets: for i in 0..declared_buckets {
        throttle.tick(i as f32 / declared_buckets as f32);
        let Some(slot_va) = buckets_ptr.checked_add(i * 4) else {
            summary.dead_links += 1;
            break;
        };
        let Some(mut node) = snap.read_u32(slot_va) else {
            summary.dead_links += 1;
            continue;
        };

        while node != 0 {
            steps += 1;
            if steps % opts.cancel_every == 0 && cancel.is_cancelled() {
                summary.truncated = true;
                break 'buckets;
            }

            // Cheap filter first: most junk never reaches the translator.
            if snap.classify(node) != AddressClass::Heap {
                summary.dead_links += 1;
                break;
            }
            if !visited.insert(node) {
                trace!("cycle at {node:#010x}, ending chain");
                summary.cycles += 1;
                break;
            }
            // The full fixed node must be mapped before either field is read.
            if snap.read_bytes(node, NODE_LEN).is_none() {
                summary.dead_links += 1;
                break;
            }
            let (Some(next), Some(payload)) = (snap.read_u32(node), snap.read_u32(node + 4))
            else {
                summary.dead_links += 1;
                break;
            };

            if let Some(value) = reader.read(snap, payload) {
                summary.extracted += 1;
                if summary.samples.len() < opts.max_samples {
                    summary.samples.push(value);
                }
                if summary.extracted as usize >= opts.max_entries {
                    summary.truncated = true;
                    break 'buckets;
                }
            }
            node = next;
        }
    }

    throttle.finish();
    Some(summary)
}

/// Read a numeric field at a fixed offset inside a struct, clamping
/// implausible or unreadable values to the default. Captured memory may be
/// stale or belong to an unrelated object; junk must not propagate.
pub fn read_field_u32(
    snap: &Snapshot<'_>,
    base_va: u32,
    field_offset: u32,
    plausible: RangeInclusive<u32>,
    default: u32,
) -> u32 {
    match snap.read_u32(base_va.wrapping_add(field_offset)) {
        Some(v) if plausible.contains(&v) => v,
        _ => default,
    }
}

/// `read_field_u32` for big-endian float fields.
pub fn read_field_f32(
    snap: &Snapshot<'_>,
    base_va: u32,
    field_offset: u32,
    plausible: RangeInclusive<f32>,
    default: f32,
) -> f32 {
    match snap.read_f32(base_va.wrapping_add(field_offset)) {
        Some(v) if v.is_finite() && plausible.contains(&v) => v,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MemoryRegion, PlatformLayout, RegionMap};

    const HEAP: u32 = 0x4000_0000;
    const MODULE_VTABLE: u32 = 0x8240_0000;

    struct Builder {
        buf: Vec<u8>,
    }

    impl Builder {
        fn new(size: usize) -> Self {
            Self {
                buf: vec![0u8; size],
            }
        }

        fn put_u32(&mut self, va: u32, value: u32) {
            let at = (va - HEAP) as usize;
            self.buf[at..at + 4].copy_from_slice(&value.to_be_bytes());
        }

        fn put_str(&mut self, va: u32, s: &str) {
            let at = (va - HEAP) as usize;
            self.buf[at..at + s.len()].copy_from_slice(s.as_bytes());
            self.buf[at + s.len()] = 0;
        }

        fn map(&self) -> RegionMap {
            RegionMap::new(vec![MemoryRegion {
                va_start: HEAP,
                size: self.buf.len() as u32,
                file_offset: 0,
            }])
            .unwrap()
        }
    }

    /// Table at 0x4000_0000 with two buckets, two nodes in bucket 0 and one
    /// in bucket 1, payload strings behind pointers.
    fn build_table() -> Builder {
        let mut b = Builder::new(0x1000);
        // header
        b.put_u32(HEAP, MODULE_VTABLE);
        b.put_u32(HEAP + 4, 2); // buckets
        b.put_u32(HEAP + 8, HEAP + 0x100); // bucket array
        b.put_u32(HEAP + 12, 3); // element count
        // bucket array
        b.put_u32(HEAP + 0x100, HEAP + 0x200); // bucket 0 head
        b.put_u32(HEAP + 0x104, HEAP + 0x280); // bucket 1 head
        // bucket 0: node -> node -> nil
        b.put_u32(HEAP + 0x200, HEAP + 0x240); // next
        b.put_u32(HEAP + 0x204, HEAP + 0x300); // payload
        b.put_u32(HEAP + 0x240, 0);
        b.put_u32(HEAP + 0x244, HEAP + 0x310);
        // bucket 1: single node
        b.put_u32(HEAP + 0x280, 0);
        b.put_u32(HEAP + 0x284, HEAP + 0x320);
        // payload strings
        b.put_str(HEAP + 0x300, "iron_sword");
        b.put_str(HEAP + 0x310, "rusty_key");
        b.put_str(HEAP + 0x320, "ectoplasm");
        b
    }

    fn reader() -> CStringReader {
        CStringReader { max_len: 64 }
    }

    #[test]
    fn walks_buckets_and_extracts_payloads() {
        let b = build_table();
        let map = b.map();
        let snap = Snapshot::new(&b.buf, &map, PlatformLayout::default());

        let summary = walk_hash_table(
            &snap,
            HEAP,
            &reader(),
            &WalkOptions::default(),
            &CancelToken::new(),
            None,
        )
        .unwrap();

        assert!(summary.populated);
        assert_eq!(summary.declared_buckets, 2);
        assert_eq!(summary.declared_count, 3);
        assert_eq!(summary.extracted, 3);
        assert_eq!(summary.samples, vec!["iron_sword", "rusty_key", "ectoplasm"]);
        assert_eq!(summary.cycles, 0);
    }

    #[test]
    fn shared_cycle_across_buckets_terminates() {
        let mut b = build_table();
        // Corrupt both buckets into the same two-node loop.
        b.put_u32(HEAP + 0x200, HEAP + 0x240);
        b.put_u32(HEAP + 0x240, HEAP + 0x200); // loop back
        b.put_u32(HEAP + 0x104, HEAP + 0x240); // bucket 1 joins the loop
        let map = b.map();
        let snap = Snapshot::new(&b.buf, &map, PlatformLayout::default());

        let summary = walk_hash_table(
            &snap,
            HEAP,
            &reader(),
            &WalkOptions::default(),
            &CancelToken::new(),
            None,
        )
        .unwrap();

        // Each node visited exactly once; both chains end on a revisit.
        assert_eq!(summary.extracted, 2);
        assert_eq!(summary.cycles, 2);
    }

    #[test]
    fn implausible_bucket_count_reports_unpopulated() {
        let mut b = build_table();
        b.put_u32(HEAP + 4, 2_000_000);
        let map = b.map();
        let snap = Snapshot::new(&b.buf, &map, PlatformLayout::default());

        let summary = walk_hash_table(
            &snap,
            HEAP,
            &reader(),
            &WalkOptions::default(),
            &CancelToken::new(),
            None,
        )
        .unwrap();
        assert!(!summary.populated);
        assert_eq!(summary.extracted, 0);
    }

    #[test]
    fn untrusted_header_rejects_walk() {
        let mut b = build_table();
        b.put_u32(HEAP, 0x0000_1234); // vtable not module-like
        let map = b.map();
        let snap = Snapshot::new(&b.buf, &map, PlatformLayout::default());

        assert!(walk_hash_table(
            &snap,
            HEAP,
            &reader(),
            &WalkOptions::default(),
            &CancelToken::new(),
            None,
        )
        .is_none());
    }

    #[test]
    fn dead_pointers_end_chains_not_walks() {
        let mut b = build_table();
        b.put_u32(HEAP + 0x200, 0x1000_0000); // next is not heap-like
        let map = b.map();
        let snap = Snapshot::new(&b.buf, &map, PlatformLayout::default());

        let summary = walk_hash_table(
            &snap,
            HEAP,
            &reader(),
            &WalkOptions::default(),
            &CancelToken::new(),
            None,
        )
        .unwrap();
        // bucket 0 yields its first node then dies; bucket 1 still walks
        assert_eq!(summary.extracted, 2);
        assert_eq!(summary.dead_links, 1);
    }

    #[test]
    fn extraction_cap_truncates() {
        let b = build_table();
        let map = b.map();
        let snap = Snapshot::new(&b.buf, &map, PlatformLayout::default());

        let opts = WalkOptions {
            max_entries: 2,
            ..Default::default()
        };
        let summary =
            walk_hash_table(&snap, HEAP, &reader(), &opts, &CancelToken::new(), None).unwrap();
        assert!(summary.truncated);
        assert_eq!(summary.extracted, 2);
    }

    #[test]
    fn typed_field_reads_clamp_implausible_values() {
        let mut b = Builder::new(0x100);
        b.put_u32(HEAP + 0x10, 50);
        b.put_u32(HEAP + 0x14, 9_999_999);
        let map = b.map();
        let snap = Snapshot::new(&b.buf, &map, PlatformLayout::default());

        assert_eq!(read_field_u32(&snap, HEAP, 0x10, 0..=100, 0), 50);
        assert_eq!(read_field_u32(&snap, HEAP, 0x14, 0..=100, 0), 0);
        // unmapped base clamps too
        assert_eq!(read_field_u32(&snap, 0x7000_0000, 0x10, 0..=100, 7), 7);

        let weight = f32::to_bits(12.5);
        b.put_u32(HEAP + 0x20, weight);
        let map = b.map();
        let snap = Snapshot::new(&b.buf, &map, PlatformLayout::default());
        assert_eq!(read_field_f32(&snap, HEAP, 0x20, 0.0..=100.0, 0.0), 12.5);
        assert_eq!(read_field_f32(&snap, HEAP, 0x24, 1.0..=100.0, 1.0), 1.0);
    }
}
