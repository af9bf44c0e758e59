//! Stale segment collection: keep only the newest done index segment.

use serde::Serialize;

use crate::segment::SegmentSet;
use crate::types::IndexResult;

/// What a collection pass did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectReport {
    /// Generation that was kept, if any segment is done.
    pub kept: Option<u64>,
    /// Generations deleted in this pass.
    pub removed: Vec<u64>,
    /// Generations whose deletion failed; retried on the next pass.
    pub failed: Vec<u64>,
}

/// Delete every segment except the newest done one.
///
/// Building and superseded done segments are both deleted. With no done
/// segment nothing is touched. A failed deletion is logged and the pass
/// continues; only a failed listing is returned as an error.
pub fn clear_outdated(segments: &SegmentSet) -> IndexResult<CollectReport> {
    let keep = match segments.find_max_done()? {
        Some(segm) => segm,
        None => {
            log::info!(
                "No done {} segment under {}, nothing to collect",
                segments.kind(),
                segments.root().display()
            );
            return Ok(CollectReport::default());
        }
    };

    let mut report = CollectReport {
        kept: Some(keep.generation()),
        ..CollectReport::default()
    };

    for segm in segments.list_all()? {
        if segm.generation() == keep.generation() {
            continue;
        }
        match segments.remove(&segm) {
            Ok(()) => {
                log::info!("Segment {} deleted", segm);
                report.removed.push(segm.generation());
            }
            Err(e) => {
                log::warn!("Delete segment {} failed: {}", segm, e);
                report.failed.push(segm.generation());
            }
        }
    }

    Ok(report)
}
