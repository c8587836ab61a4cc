//! Read-only mapped views over dump and asset files.
//!
//! Carving and walking both operate on one immutable byte buffer. This module
//! provides `MappedDump`, a read-only memory map of that buffer established
//! once up front; no other I/O happens afterwards. A map or open failure is a
//! `BackingStoreFailure`-class fault and propagates, unlike every data-level
//! failure in this crate.

use crate::error::Result;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A read-only memory-mapped dump or asset file.
#[derive(Debug)]
pub struct MappedDump {
    path: PathBuf,
    // None when the file size is zero; memmap cannot map empty files.
    mmap: Option<Mmap>,
    file_size: u64,
}

impl MappedDump {
    /// Opens a file and memory-maps it read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();

        debug!(path = %path.display(), size = file_size, "mapping dump read-only");

        // For zero-length files, do not attempt to mmap (unsupported); keep None.
        let mmap = if file_size == 0 {
            None
        } else {
            // Safety: backed by a real file and we only request a read-only map.
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            file_size,
        })
    }

    /// Total size of the underlying file in bytes.
    pub fn len(&self) -> u64 {
        self.file_size
    }

    /// Whether the underlying file is empty.
    pub fn is_empty(&self) -> bool {
        self.file_size == 0
    }

    /// Path the view was established over.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The full mapped buffer. Empty slice for a zero-length file.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.mmap {
            Some(m) => &m[..],
            None => &[],
        }
    }
}
