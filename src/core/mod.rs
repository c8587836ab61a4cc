//! Core data types shared by the carver and the struct walker.

pub mod address;
pub mod candidate;
pub mod carved;
pub mod progress;
pub mod region;
pub mod stats;

pub use address::{AddressClass, PlatformLayout};
pub use candidate::{CandidateHit, FormatId};
pub use carved::{BoundaryKind, CarveMetadata, CarvedRegion, HeaderEndian};
pub use progress::{CancelToken, ProgressFn, ProgressThrottle};
pub use region::{MemoryRegion, RegionMap};
pub use stats::{CarveStats, FormatCounters};
