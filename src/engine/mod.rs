//! High-level operations: the indexing pipeline, stale segment collection
//! and the run lock that serializes them.

pub mod collector;
pub mod lock;
pub mod pipeline;
pub mod run;

pub use collector::{clear_outdated, CollectReport};
pub use lock::RunLock;
pub use pipeline::{IndexPipeline, IndexReport};
pub use run::{run_indexer, IndexRunReport};
