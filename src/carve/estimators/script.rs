//! Script source text estimator.
//!
//! Script sources live in memory as loose ASCII blobs back to back, so the
//! only reliable boundary signals are the start-keyword header line of the
//! next script and the end of printable text. The accepted region runs from
//! a validated header line to the next start keyword (rewound to the line
//! break before it) or to the first non-printable byte, whichever comes
//! first, with trailing whitespace trimmed off.

use super::{Accepted, BoundaryEstimator};
use crate::carve::config::CarveConfig;
use crate::core::CarveMetadata;
use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// Start keywords in the casings shipped content actually uses; the scanner
/// needs exact literals, the estimator re-validates case-insensitively.
pub const MAGIC_VARIANTS: [&[u8]; 8] = [
    b"scn",
    b"Scn",
    b"SCN",
    b"scriptname",
    b"ScriptName",
    b"Scriptname",
    b"SCriptName",
    b"SCRIPTNAME",
];

static RE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:scn|scriptname)[ \t]+([A-Za-z0-9_]+)").unwrap()
});

static RE_NEXT_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[\r\n])[ \t]*(?:scn|scriptname)[ \t]+[A-Za-z0-9_]+").unwrap()
});

fn printable(b: u8) -> bool {
    (0x20..=0x7E).contains(&b) || b == b'\t' || b == b'\r' || b == b'\n'
}

pub struct ScriptEstimator;

impl BoundaryEstimator for ScriptEstimator {
    fn estimate(&self, buf: &[u8], offset: usize, cfg: &CarveConfig) -> Option<Accepted> {
        let window_end = buf.len().min(offset + cfg.walk_limits.max_script_len);
        let window = &buf[offset..window_end];

        let header = RE_HEADER.captures(window)?;
        let name = std::str::from_utf8(header.get(1)?.as_bytes()).ok()?.to_string();
        let first_line_end = header.get(0)?.end();

        // Printable prefix bounds everything; memory past the script is
        // binary noise far more often than another script.
        let printable_end = window
            .iter()
            .position(|&b| !printable(b))
            .unwrap_or(window.len());
        if printable_end < first_line_end {
            return None;
        }
        let text = &window[..printable_end];

        // Next script header ends this one, rewound to the prior line break.
        let mut end = printable_end;
        if let Some(m) = RE_NEXT_HEADER.find_at(text, first_line_end) {
            let keyword_at = if text[m.start()] == b'\r' || text[m.start()] == b'\n' {
                m.start() + 1
            } else {
                m.start()
            };
            end = text[..keyword_at]
                .iter()
                .rposition(|&b| b == b'\n' || b == b'\r')
                .map(|p| p + 1)
                .unwrap_or(keyword_at);
        }

        while end > 0 && text[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        if end < first_line_end {
            return None;
        }

        Some(Accepted {
            length: end,
            confidence: 0.7,
            metadata: CarveMetadata::Script { name },
        })
    }
}
