//! pkg-index: the indexing backbone of a package search engine.
//!
//! Crawled document records arrive as versioned document-database
//! segments. The indexing pipeline turns one of them into a new index
//! segment, publishes it with a completion marker, and retires the input;
//! the collector then deletes every index segment but the newest done one.
//! Leaderboards over the published index are computed with a bounded
//! top-K selector.

pub mod cli;
pub mod config;
pub mod docdb;
pub mod engine;
pub mod format;
pub mod index;
pub mod rank;
pub mod segment;
pub mod snapshot;
pub mod types;

// Re-export commonly used types at the crate root
pub use config::IndexerConfig;
pub use docdb::MemDb;
pub use engine::{
    clear_outdated, run_indexer, CollectReport, IndexPipeline, IndexReport, IndexRunReport,
    RunLock,
};
pub use format::{ArtifactReader, ArtifactWriter};
pub use index::{build_index, TermStats};
pub use rank::{stat_tops, StatItem, StatList, TopN};
pub use segment::{Segment, SegmentKind, SegmentSet, SegmentState};
pub use types::{
    now_micros, DocRecord, HitInfo, IndexError, IndexResult, FIRST_GENERATION, INDEX_FILE_NAME,
};
