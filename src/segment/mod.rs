//! Versioned segments and their lifecycle on disk.
//!
//! A segment is one generation of persisted data of a given kind. Its
//! directory is created in the *building* state, becomes *done* once the
//! completion marker is written, and is *removed* by deleting the directory.

pub mod set;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::types::DONE_MARKER;

pub use set::SegmentSet;

/// What a segment stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SegmentKind {
    /// A crawled document snapshot.
    DocDb,
    /// A built index artifact.
    Index,
}

impl SegmentKind {
    /// Return a human-readable name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DocDb => "docdb",
            Self::Index => "index",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Lifecycle state of a segment as observed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SegmentState {
    Building,
    Done,
    Removed,
}

impl SegmentState {
    /// Return a human-readable name for this state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Done => "done",
            Self::Removed => "removed",
        }
    }
}

/// One generation of one kind. Only a [`SegmentSet`] hands these out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    kind: SegmentKind,
    generation: u64,
    path: PathBuf,
}

impl Segment {
    pub(crate) fn new(kind: SegmentKind, generation: u64, path: PathBuf) -> Self {
        Self {
            kind,
            generation,
            path,
        }
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The segment's storage directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the segment.
    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Whether the completion marker is present.
    pub fn is_done(&self) -> bool {
        self.join(DONE_MARKER).is_file()
    }

    /// Current lifecycle state, derived from the directory and marker.
    pub fn state(&self) -> SegmentState {
        if !self.path.is_dir() {
            SegmentState::Removed
        } else if self.is_done() {
            SegmentState::Done
        } else {
            SegmentState::Building
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Directory name for a generation.
pub(crate) fn dir_name(generation: u64) -> String {
    format!("{:08}", generation)
}

/// Parse a directory name back into a generation. Only canonical names
/// produced by [`dir_name`] are accepted.
pub(crate) fn parse_dir_name(name: &str) -> Option<u64> {
    let generation: u64 = name.parse().ok()?;
    (dir_name(generation) == name).then_some(generation)
}
