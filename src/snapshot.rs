//! The process-wide index snapshot.
//!
//! The snapshot is published at most once per process and is immutable
//! afterwards; every reader shares the same `Arc`. Picking up a newer
//! index means starting a new process.

use std::sync::{Arc, OnceLock};

use crate::format::ArtifactReader;
use crate::index::TermStats;
use crate::rank::{stat_tops as build_stat_tops, StatList};
use crate::segment::{Segment, SegmentSet};
use crate::types::{IndexError, IndexResult, INDEX_FILE_NAME};

static CURRENT: OnceLock<Arc<TermStats>> = OnceLock::new();

/// Publish `stats` as the process-wide index.
pub fn publish(stats: TermStats) -> IndexResult<Arc<TermStats>> {
    let stats = Arc::new(stats);
    CURRENT
        .set(Arc::clone(&stats))
        .map_err(|_| IndexError::AlreadyPublished)?;
    Ok(stats)
}

/// The published index, if any.
pub fn current() -> Option<Arc<TermStats>> {
    CURRENT.get().cloned()
}

/// Read the newest done index segment and publish it.
///
/// Returns `Ok(None)` when no index segment is done yet.
pub fn load_latest(segments: &SegmentSet) -> IndexResult<Option<Arc<TermStats>>> {
    let segm = match segments.find_max_done()? {
        Some(segm) => segm,
        None => return Ok(None),
    };
    log::info!("Loading index from {}", segm);
    let stats = read_segment(&segm)?;
    log::info!("Loaded index: {} docs", stats.doc_count());
    publish(stats).map(Some)
}

/// Read the artifact of an index segment without publishing it.
pub fn read_segment(segm: &Segment) -> IndexResult<TermStats> {
    ArtifactReader::read_from_file(&segm.join(INDEX_FILE_NAME))
}

/// Leaderboards over the published index; empty when nothing is published.
pub fn stat_tops(n: usize) -> Vec<StatList> {
    match current() {
        Some(stats) => build_stat_tops(&stats, n),
        None => Vec::new(),
    }
}

/// Like [`load_latest`], but fails with [`IndexError::NoIndex`] when
/// nothing is done.
pub fn require_latest(segments: &SegmentSet) -> IndexResult<Arc<TermStats>> {
    load_latest(segments)?.ok_or(IndexError::NoIndex)
}
