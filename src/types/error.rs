//! Error types for the pkg-index library.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can occur in the pkg-index library.
#[derive(Error, Debug)]
pub enum IndexError {
    /// A new segment generation could not be determined or created.
    #[error("Cannot allocate segment under {root}: {reason}")]
    Allocation { root: PathBuf, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Index construction failed.
    #[error("Index build failed: {0}")]
    Build(String),

    /// A document record has no package identifier. `record` is the
    /// 1-based position of the record in the database, not a file line.
    #[error("Document record {record} has an empty package identifier")]
    EmptyPackage { record: usize },

    /// The same package appears twice in one document database.
    #[error("Duplicate package in document database: {0}")]
    DuplicatePackage(String),

    /// Invalid magic bytes in artifact header.
    #[error("Invalid magic bytes in artifact header")]
    InvalidMagic,

    /// Unsupported artifact format version.
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u32),

    /// File is empty or truncated.
    #[error("File is empty or truncated")]
    Truncated,

    /// Corrupt data at a given offset.
    #[error("Corrupt data at offset {0}")]
    Corrupt(u64),

    /// Compression error.
    #[error("Compression error: {0}")]
    Compression(String),

    /// Malformed document record or JSON input.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(String),

    /// The process-wide index snapshot was already set.
    #[error("Index snapshot already published")]
    AlreadyPublished,

    /// No done index segment exists.
    #[error("No published index found")]
    NoIndex,

    /// Another indexing run holds the lock.
    #[error("Indexer lock is held: {0}")]
    Locked(PathBuf),
}

/// Convenience result type for pkg-index operations.
pub type IndexResult<T> = Result<T, IndexError>;
