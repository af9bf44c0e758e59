//! All segments of one kind under a root directory.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::types::{now_micros, IndexError, IndexResult, DONE_MARKER, FIRST_GENERATION};

use super::{dir_name, parse_dir_name, Segment, SegmentKind};

/// Bookkeeping for every generation of one segment kind.
///
/// No mutual exclusion is provided across processes: two concurrent
/// callers of [`SegmentSet::gen_max_segment`] may compute the same
/// generation, in which case one of them fails with an allocation error.
#[derive(Debug, Clone)]
pub struct SegmentSet {
    kind: SegmentKind,
    root: PathBuf,
}

impl SegmentSet {
    /// Create a set rooted at `root`. The directory is created lazily.
    pub fn new(kind: SegmentKind, root: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            root: root.into(),
        }
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The segment handle for a generation, whether or not it exists.
    pub fn segment(&self, generation: u64) -> Segment {
        Segment::new(self.kind, generation, self.root.join(dir_name(generation)))
    }

    /// Every generation present on disk, building and done, ascending.
    ///
    /// A missing root yields an empty list. Entries that are not
    /// canonical generation directories are ignored.
    pub fn list_all(&self) -> IndexResult<Vec<Segment>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(IndexError::Io(e)),
        };

        let mut generations = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(generation) = entry.file_name().to_str().and_then(parse_dir_name) {
                generations.push(generation);
            }
        }
        generations.sort_unstable();

        Ok(generations.into_iter().map(|g| self.segment(g)).collect())
    }

    /// The newest generation carrying a completion marker, if any.
    pub fn find_max_done(&self) -> IndexResult<Option<Segment>> {
        let all = self.list_all()?;
        Ok(all.into_iter().rev().find(Segment::is_done))
    }

    /// Allocate `max + 1` (or [`FIRST_GENERATION`]) and create its
    /// directory in the building state.
    pub fn gen_max_segment(&self) -> IndexResult<Segment> {
        let all = self.list_all().map_err(|e| self.allocation_error(e))?;
        let generation = match all.last() {
            Some(max) => max
                .generation()
                .checked_add(1)
                .ok_or_else(|| self.allocation_error("generation space exhausted"))?,
            None => FIRST_GENERATION,
        };

        fs::create_dir_all(&self.root).map_err(|e| self.allocation_error(e))?;
        let segment = self.segment(generation);
        // create_dir (not create_dir_all) so a racing allocation is detected
        fs::create_dir(segment.path()).map_err(|e| self.allocation_error(e))?;

        log::debug!("Allocated {} segment {}", self.kind, segment);
        Ok(segment)
    }

    /// Write the completion marker. Calling it again is a no-op.
    pub fn done(&self, segment: &Segment) -> IndexResult<()> {
        let marker = segment.join(DONE_MARKER);
        if marker.is_file() {
            return Ok(());
        }
        let mut file = fs::File::create(&marker)?;
        writeln!(file, "{}", now_micros())?;
        file.sync_all()?;
        log::debug!("Segment {} marked done", segment);
        Ok(())
    }

    /// Recursively delete the segment directory. Deleting a segment that
    /// is already gone succeeds.
    pub fn remove(&self, segment: &Segment) -> IndexResult<()> {
        match fs::remove_dir_all(segment.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(IndexError::Io(e)),
        }
    }

    fn allocation_error(&self, cause: impl std::fmt::Display) -> IndexError {
        IndexError::Allocation {
            root: self.root.clone(),
            reason: cause.to_string(),
        }
    }
}
