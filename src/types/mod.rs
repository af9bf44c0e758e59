//! All data types for the pkg-index library.

pub mod document;
pub mod error;
pub mod header;
pub mod hit;

pub use document::DocRecord;
pub use error::{IndexError, IndexResult};
pub use header::{ArtifactHeader, HEADER_SIZE};
pub use hit::HitInfo;

/// Magic bytes at the start of every index artifact file.
pub const PIDX_MAGIC: [u8; 4] = [0x50, 0x49, 0x44, 0x58]; // "PIDX"

/// Current artifact format version.
pub const FORMAT_VERSION: u32 = 1;

/// Name of the index artifact file inside an index segment.
pub const INDEX_FILE_NAME: &str = "termstats.pidx";

/// Name of the document file inside a document-database segment.
pub const DOCS_FILE_NAME: &str = "docs.jsonl";

/// Name of the completion marker inside any segment.
pub const DONE_MARKER: &str = ".done";

/// Generation assigned to the first segment of an empty set.
pub const FIRST_GENERATION: u64 = 1;

/// Returns the current time as Unix epoch microseconds.
pub fn now_micros() -> u64 {
    chrono::Utc::now().timestamp_micros() as u64
}
