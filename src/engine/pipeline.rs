//! The indexing pipeline: one document-database segment in, one published
//! index segment out.

use serde::Serialize;

use crate::config::IndexerConfig;
use crate::docdb::MemDb;
use crate::format::ArtifactWriter;
use crate::index::build_index;
use crate::segment::{Segment, SegmentSet};
use crate::types::{now_micros, IndexError, IndexResult, INDEX_FILE_NAME};

/// Result of a successful indexing run.
#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    /// Generation of the consumed document-database segment.
    pub input_generation: u64,
    /// Generation of the newly published index segment.
    pub index_generation: u64,
    /// Number of indexed documents.
    pub doc_count: usize,
    /// Number of distinct terms.
    pub term_count: usize,
    /// Whether the input segment was deleted after publishing.
    pub input_removed: bool,
    /// Wall time of the run in microseconds.
    pub elapsed_micros: u64,
}

/// Orchestrates one indexing run. Runs sequentially; callers serialize
/// runs across processes (see [`super::RunLock`]).
pub struct IndexPipeline {
    docdb_segments: SegmentSet,
    index_segments: SegmentSet,
}

impl IndexPipeline {
    /// Create a pipeline over the given segment sets.
    pub fn new(docdb_segments: SegmentSet, index_segments: SegmentSet) -> Self {
        Self {
            docdb_segments,
            index_segments,
        }
    }

    /// Create a pipeline over the segment roots named by `config`.
    pub fn from_config(config: &IndexerConfig) -> Self {
        Self::new(config.docdb_segments(), config.index_segments())
    }

    pub fn index_segments(&self) -> &SegmentSet {
        &self.index_segments
    }

    /// Index `db_segm` into a new index segment, publish it, then remove
    /// the input.
    ///
    /// Any failure before publishing leaves the input in place and the new
    /// index segment unmarked, so the same input can be retried and the
    /// collector will delete the partial output. Failing to remove the
    /// input after publishing is logged and reported, not returned.
    pub fn run(&self, db_segm: &Segment) -> IndexResult<IndexReport> {
        let started = now_micros();

        if !db_segm.is_done() {
            log::error!("Input segment {} is not done", db_segm);
            return Err(IndexError::Build(format!(
                "input segment {} is not done",
                db_segm
            )));
        }

        // Step 1: Allocate the output segment
        let idx_segm = self
            .index_segments
            .gen_max_segment()
            .inspect_err(|e| log::error!("GenMaxSegment failed: {}", e))?;

        // Step 2: Load the document database
        log::info!("Reading docDB from {} ...", db_segm);
        let db = MemDb::load(db_segm)
            .inspect_err(|e| log::error!("Loading docDB {} failed: {}", db_segm, e))?;

        // Step 3: Build
        log::info!("Indexing {} docs to {} ...", db.len(), idx_segm);
        let stats =
            build_index(&db).inspect_err(|e| log::error!("Indexing {} failed: {}", db_segm, e))?;
        log::debug!("Releasing docDB ({} docs)", db.len());
        drop(db);

        // Step 4: Persist; the file handle is closed on every path
        let index_path = idx_segm.join(INDEX_FILE_NAME);
        ArtifactWriter::write_to_file(&stats, &index_path)
            .inspect_err(|e| log::error!("Saving {} failed: {}", index_path.display(), e))?;

        // Step 5: Publish
        self.index_segments
            .done(&idx_segm)
            .inspect_err(|e| log::error!("Marking {} done failed: {}", idx_segm, e))?;

        let doc_count = stats.doc_count();
        let term_count = stats.term_count();
        log::info!("Indexing success: {} ({} docs)", idx_segm, doc_count);
        log::debug!("Releasing term statistics ({} terms)", term_count);
        drop(stats);

        // Step 6: Retire the input
        let input_removed = match self.docdb_segments.remove(db_segm) {
            Ok(()) => {
                log::info!("Segment {} deleted", db_segm);
                true
            }
            Err(e) => {
                log::warn!("Delete segment {} failed: {}", db_segm, e);
                false
            }
        };

        Ok(IndexReport {
            input_generation: db_segm.generation(),
            index_generation: idx_segm.generation(),
            doc_count,
            term_count,
            input_removed,
            elapsed_micros: now_micros().saturating_sub(started),
        })
    }
}
