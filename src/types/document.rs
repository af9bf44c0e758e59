//! Crawled document records, the input of an indexing run.

use serde::{Deserialize, Serialize};

/// One crawled package, as stored in a document-database segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocRecord {
    /// Full import path of the package, e.g. `github.com/user/repo/pkg`.
    pub package: String,
    /// Declared package name.
    #[serde(default)]
    pub name: String,
    /// One-line description.
    #[serde(default)]
    pub synopsis: String,
    /// Packages imported by this one.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Popularity counter reported by the hosting site.
    #[serde(default)]
    pub star_count: u32,
}

impl DocRecord {
    /// Create a record with only the package path and name set.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            synopsis: String::new(),
            imports: Vec::new(),
            star_count: 0,
        }
    }

    /// Set the synopsis.
    pub fn synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = synopsis.into();
        self
    }

    /// Set the imported packages.
    pub fn imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    /// Set the star count.
    pub fn star_count(mut self, stars: u32) -> Self {
        self.star_count = stars;
        self
    }
}
