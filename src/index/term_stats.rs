//! Term statistics: the index artifact held in memory.

use std::collections::BTreeMap;

use crate::types::HitInfo;

use super::tokenize::tokenize;

/// A built index: one [`HitInfo`] per document plus inverted postings.
///
/// Doc ids are positions in the hit list. Postings are ascending and
/// unique. Once built the structure is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct TermStats {
    hits: Vec<HitInfo>,
    postings: BTreeMap<String, Vec<u32>>,
    created_at: u64,
}

impl TermStats {
    /// Create from pre-existing data (used by the builder and reader).
    pub fn from_parts(
        hits: Vec<HitInfo>,
        postings: BTreeMap<String, Vec<u32>>,
        created_at: u64,
    ) -> Self {
        Self {
            hits,
            postings,
            created_at,
        }
    }

    pub fn doc_count(&self) -> usize {
        self.hits.len()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// When the index was built (Unix epoch microseconds).
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Look up a document by id.
    pub fn get(&self, doc_id: u32) -> Option<&HitInfo> {
        self.hits.get(doc_id as usize)
    }

    /// Every document, in doc id order.
    pub fn scan(&self) -> impl Iterator<Item = (u32, &HitInfo)> + '_ {
        self.hits.iter().enumerate().map(|(i, hit)| (i as u32, hit))
    }

    /// Doc ids containing a single (already normalized) term.
    pub fn postings_for(&self, term: &str) -> &[u32] {
        self.postings
            .get(term)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Doc ids containing every term of the query, ascending.
    ///
    /// The query is tokenized the same way documents are. An empty query
    /// matches nothing.
    pub fn search(&self, query: &str) -> Vec<u32> {
        let mut lists: Vec<&[u32]> = tokenize(query).map(|t| self.postings_for(&t)).collect();
        if lists.is_empty() {
            return Vec::new();
        }
        // Intersect starting from the shortest list
        lists.sort_by_key(|l| l.len());

        let mut result: Vec<u32> = lists[0].to_vec();
        for list in &lists[1..] {
            result.retain(|id| list.binary_search(id).is_ok());
            if result.is_empty() {
                break;
            }
        }
        result
    }

    pub fn hits(&self) -> &[HitInfo] {
        &self.hits
    }

    /// Get a reference to the postings map (for serialization).
    pub fn postings(&self) -> &BTreeMap<String, Vec<u32>> {
        &self.postings
    }
}
