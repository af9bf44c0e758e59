//! One scheduled invocation: index the newest crawl, then collect.

use serde::Serialize;

use crate::config::IndexerConfig;
use crate::types::IndexResult;

use super::collector::{clear_outdated, CollectReport};
use super::lock::RunLock;
use super::pipeline::{IndexPipeline, IndexReport};

/// Result of [`run_indexer`].
#[derive(Debug, Clone, Serialize)]
pub struct IndexRunReport {
    /// Set when a document-database segment was indexed.
    pub indexed: Option<IndexReport>,
    pub collected: CollectReport,
}

/// Take the run lock, index the newest done document-database segment
/// (if any), then collect stale index segments.
///
/// A pipeline failure is returned without collecting, so the previous
/// index and the failed partial segment are both still on disk for
/// inspection; the next successful run collects them.
pub fn run_indexer(config: &IndexerConfig) -> IndexResult<IndexRunReport> {
    let _lock = RunLock::acquire(&config.lock_path())?;
    let pipeline = IndexPipeline::from_config(config);

    let indexed = match config.docdb_segments().find_max_done()? {
        Some(db_segm) => Some(pipeline.run(&db_segm)?),
        None => {
            log::info!("No done docDB segment to index");
            None
        }
    };

    let collected = clear_outdated(pipeline.index_segments())?;
    Ok(IndexRunReport { indexed, collected })
}
