//! Single-pass multi-pattern signature scanning.
//!
//! One Aho-Corasick automaton holds every registered magic, so cost stays
//! O(buffer) no matter how many formats are registered. Large buffers are
//! sharded across rayon workers; each shard is extended by pattern_len - 1
//! bytes so a signature straddling a shard edge is still seen exactly once,
//! and shard results merge back into strict ascending-offset order.
//!
//! No validation happens here. Overlapping and false hits are expected and
//! resolved by the estimators downstream.

use crate::core::{CancelToken, CandidateHit, FormatId};
use aho_corasick::AhoCorasick;
use rayon::prelude::*;
use tracing::debug;

/// Shard size for parallel scans. Buffers at or below this run single-threaded.
const SHARD_SIZE: usize = 4 << 20;

/// Multi-pattern scanner over an immutable byte buffer.
pub struct SignatureScanner {
    automaton: AhoCorasick,
    // pattern index -> format owning that magic variant
    formats: Vec<FormatId>,
    max_pattern_len: usize,
}

impl SignatureScanner {
    /// Build a scanner from `(magic, format)` pairs.
    ///
    /// Patterns are plain byte literals; a format may register several
    /// variants. Construction happens once at startup, never per scan.
    pub fn new<'p>(patterns: impl IntoIterator<Item = (&'p [u8], FormatId)>) -> Self {
        let (magics, formats): (Vec<&[u8]>, Vec<FormatId>) = patterns.into_iter().unzip();
        debug_assert!(!magics.is_empty());
        let max_pattern_len = magics.iter().map(|m| m.len()).max().unwrap_or(1);
        let automaton = AhoCorasick::new(&magics).expect("static magic set must compile");
        Self {
            automaton,
            formats,
            max_pattern_len,
        }
    }

    /// Scan the whole buffer, producing every magic occurrence in ascending
    /// offset order. Returns what was found so far if cancelled mid-scan.
    pub fn scan(&self, buf: &[u8], cancel: &CancelToken) -> Vec<CandidateHit> {
        if buf.len() <= SHARD_SIZE {
            let mut hits = self.scan_window(buf, 0, buf.len());
            Self::finalize(&mut hits);
            return hits;
        }

        let overlap = self.max_pattern_len - 1;
        let shard_count = buf.len().div_ceil(SHARD_SIZE);
        let mut hits: Vec<CandidateHit> = (0..shard_count)
            .into_par_iter()
            .flat_map_iter(|i| {
                if cancel.is_cancelled() {
                    return Vec::new().into_iter();
                }
                let logical_start = i * SHARD_SIZE;
                let logical_end = (logical_start + SHARD_SIZE).min(buf.len());
                let phys_end = (logical_end + overlap).min(buf.len());
                let mut shard = self.scan_window(buf, logical_start, phys_end);
                // Hits opening in the overlap belong to the next shard.
                shard.retain(|h| h.offset < logical_end);
                shard.into_iter()
            })
            .collect();

        Self::finalize(&mut hits);
        debug!(hits = hits.len(), shards = shard_count, "signature scan complete");
        hits
    }

    fn scan_window(&self, buf: &[u8], start: usize, end: usize) -> Vec<CandidateHit> {
        let mut out = Vec::new();
        for mat in self.automaton.find_overlapping_iter(&buf[start..end]) {
            out.push(CandidateHit {
                offset: start + mat.start(),
                format: self.formats[mat.pattern().as_usize()],
            });
        }
        out
    }

    fn finalize(hits: &mut Vec<CandidateHit>) {
        // Overlapping iteration orders by match end; two magic variants of one
        // format can also fire at the same offset. Sort and collapse so the
        // output is strictly ascending and deterministic.
        hits.sort_unstable_by_key(|h| (h.offset, h.format.name()));
        hits.dedup();
    }

    /// Longest registered magic, exposed for shard-overlap tests.
    pub fn max_pattern_len(&self) -> usize {
        self.max_pattern_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> SignatureScanner {
        SignatureScanner::new([
            (b"RIFF".as_slice(), FormatId::Wave),
            (b"DDS ".as_slice(), FormatId::Dds),
            (b"\x89PNG\r\n\x1a\n".as_slice(), FormatId::Png),
        ])
    }

    #[test]
    fn finds_every_occurrence_ascending() {
        let mut buf = vec![0u8; 256];
        buf[10..14].copy_from_slice(b"RIFF");
        buf[14..18].copy_from_slice(b"DDS "); // back-to-back
        buf[200..204].copy_from_slice(b"RIFF");

        let hits = scanner().scan(&buf, &CancelToken::new());
        assert_eq!(
            hits,
            vec![
                CandidateHit { offset: 10, format: FormatId::Wave },
                CandidateHit { offset: 14, format: FormatId::Dds },
                CandidateHit { offset: 200, format: FormatId::Wave },
            ]
        );
    }

    #[test]
    fn pattern_straddling_shard_boundary_is_found_once() {
        // Place a magic across the 4MiB shard edge of a two-shard buffer.
        let mut buf = vec![0u8; SHARD_SIZE + 1024];
        let edge = SHARD_SIZE - 2;
        buf[edge..edge + 4].copy_from_slice(b"RIFF");

        let hits = scanner().scan(&buf, &CancelToken::new());
        assert_eq!(hits, vec![CandidateHit { offset: edge, format: FormatId::Wave }]);
    }

    #[test]
    fn empty_and_patternless_windows() {
        let hits = scanner().scan(&[], &CancelToken::new());
        assert!(hits.is_empty());

        let hits = scanner().scan(&[0u8; 4096], &CancelToken::new());
        assert!(hits.is_empty());
    }

    #[test]
    fn cancelled_scan_still_returns() {
        let token = CancelToken::new();
        token.cancel();
        let buf = vec![0u8; SHARD_SIZE * 2];
        let hits = scanner().scan(&buf, &token);
        assert!(hits.is_empty());
    }
}
