//! Scanner output: raw, unvalidated candidate hits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of carvable formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatId {
    /// DDS image, either byte order.
    Dds,
    /// Proprietary tiled texture container (two magic variants).
    TiledTexture,
    /// RIFF/WAVE audio container.
    Wave,
    /// Gamebryo model container.
    Nif,
    /// Script source text.
    ScriptSource,
    /// Compiled script bytecode.
    ScriptBytecode,
    /// PNG image.
    Png,
    /// Bink video container.
    Bink,
}

impl FormatId {
    /// Every format, in registry order.
    pub const ALL: [FormatId; 8] = [
        FormatId::Dds,
        FormatId::TiledTexture,
        FormatId::Wave,
        FormatId::Nif,
        FormatId::ScriptSource,
        FormatId::ScriptBytecode,
        FormatId::Png,
        FormatId::Bink,
    ];

    /// Short lowercase name, stable across releases.
    pub fn name(&self) -> &'static str {
        match self {
            FormatId::Dds => "dds",
            FormatId::TiledTexture => "tiledtex",
            FormatId::Wave => "wave",
            FormatId::Nif => "nif",
            FormatId::ScriptSource => "script",
            FormatId::ScriptBytecode => "bytecode",
            FormatId::Png => "png",
            FormatId::Bink => "bink",
        }
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw signature hit. No validation has happened yet; overlapping and false
/// hits are expected and resolved downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateHit {
    /// Byte offset of the magic occurrence in the buffer.
    pub offset: usize,
    /// Format whose magic matched.
    pub format: FormatId,
}
