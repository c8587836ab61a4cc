//! Carved-region results and per-format metadata.

use crate::core::candidate::FormatId;
use serde::{Deserialize, Serialize};

/// Byte order detected for a header that exists in both encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderEndian {
    Little,
    Big,
}

/// How a compressed payload's end was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryKind {
    /// A validated successor header inside the search window bounded the
    /// payload; length includes the configured overlap margin.
    NextHeader,
    /// No successor validated in-window; length is the fallback ratio of the
    /// uncompressed size.
    RatioFallback,
}

/// Format-specific fields recovered while validating a header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CarveMetadata {
    Image {
        width: u32,
        height: u32,
        mip_count: u32,
        four_cc: String,
        endian: HeaderEndian,
    },
    TiledTexture {
        width: u32,
        height: u32,
        mip_count: u32,
        version: u32,
        uncompressed_size: u64,
        boundary: BoundaryKind,
    },
    Audio {
        format_tag: u16,
        declared_size: u32,
    },
    Model {
        version: String,
        block_count: Option<u32>,
    },
    Script {
        name: String,
    },
    Bytecode {
        statements: u32,
        begin_blocks: u32,
        end_blocks: u32,
    },
    Png,
    Video {
        declared_size: u32,
    },
}

/// One accepted region of the buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarvedRegion {
    /// Byte offset of the region start.
    pub offset: usize,
    /// Accepted length; always > 0 and within the buffer.
    pub length: usize,
    /// Format the region was carved as.
    pub format: FormatId,
    /// Confidence in [0.0, 1.0] that the region is a real instance.
    pub confidence: f32,
    /// Header fields recovered during validation.
    pub metadata: CarveMetadata,
    /// SHA-256 of the carved bytes, for downstream dedup.
    pub sha256: Option<String>,
}
