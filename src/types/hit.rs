//! Ranking records produced by scanning an index artifact.

use serde::Serialize;

/// One ranking record per indexed package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitInfo {
    /// Declared package name.
    pub name: String,
    /// Full import path.
    pub package: String,
    /// Query-independent relevance, computed once at build time.
    pub static_score: f32,
    /// Packages in the same batch that import this one, sorted.
    pub imported: Vec<String>,
    /// Popularity counter carried over from the document record.
    pub star_count: u32,
}

impl HitInfo {
    /// Number of importing packages.
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }
}
