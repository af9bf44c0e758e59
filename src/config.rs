//! Indexer configuration with TOML persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::segment::{SegmentKind, SegmentSet};
use crate::types::{IndexError, IndexResult};

/// Where segments live and how the indexer behaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Data directory holding both segment roots and the lock file
    pub data_dir: PathBuf,

    /// Document-database segment root, relative to `data_dir`
    pub docdb_dir: String,

    /// Index segment root, relative to `data_dir`
    pub index_dir: String,

    /// Rows per leaderboard
    pub top_n: usize,

    /// Run-lock file name, relative to `data_dir`
    pub lock_file: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            docdb_dir: "docdb".to_string(),
            index_dir: "index".to_string(),
            top_n: 100,
            lock_file: "indexer.lock".to_string(),
        }
    }
}

impl IndexerConfig {
    /// Defaults rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Load from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> IndexResult<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| IndexError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save as TOML.
    pub fn save(&self, path: &Path) -> IndexResult<()> {
        let text = toml::to_string_pretty(self).map_err(|e| IndexError::Config(e.to_string()))?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn docdb_segments(&self) -> SegmentSet {
        SegmentSet::new(SegmentKind::DocDb, self.data_dir.join(&self.docdb_dir))
    }

    pub fn index_segments(&self) -> SegmentSet {
        SegmentSet::new(SegmentKind::Index, self.data_dir.join(&self.index_dir))
    }

    pub fn lock_path(&self) -> PathBuf {
        self.data_dir.join(&self.lock_file)
    }
}
