//! Builds term statistics from a document database.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::docdb::MemDb;
use crate::types::{now_micros, HitInfo, IndexError, IndexResult};

use super::term_stats::TermStats;
use super::tokenize::tokenize;

/// Query-independent score of a package.
///
/// Formula: 1 + ln(1 + imported_count) + 0.5 * ln(1 + star_count)
pub fn static_score(imported_count: usize, star_count: u32) -> f32 {
    let refs = (imported_count as f64).ln_1p();
    let stars = (star_count as f64).ln_1p();
    (1.0 + refs + 0.5 * stars) as f32
}

/// Build the index for every record of `db`.
///
/// Fails on an empty package id or when a package appears twice; the
/// caller is expected to leave the input untouched in that case.
pub fn build_index(db: &MemDb) -> IndexResult<TermStats> {
    let docs = db.docs();

    // Step 1: Assign doc ids and validate package ids
    let mut doc_ids: HashMap<&str, usize> = HashMap::with_capacity(docs.len());
    for (i, doc) in docs.iter().enumerate() {
        if doc.package.trim().is_empty() {
            return Err(IndexError::EmptyPackage { record: i + 1 });
        }
        if doc_ids.insert(doc.package.as_str(), i).is_some() {
            return Err(IndexError::DuplicatePackage(doc.package.clone()));
        }
    }

    // Step 2: Invert the import lists
    let mut imported: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); docs.len()];
    for doc in docs {
        for target in &doc.imports {
            if *target == doc.package {
                continue;
            }
            if let Some(&j) = doc_ids.get(target.as_str()) {
                imported[j].insert(doc.package.as_str());
            }
        }
    }

    // Step 3: Ranking records
    let hits: Vec<HitInfo> = docs
        .iter()
        .zip(&imported)
        .map(|(doc, importers)| HitInfo {
            name: doc.name.clone(),
            package: doc.package.clone(),
            static_score: static_score(importers.len(), doc.star_count),
            imported: importers.iter().map(|s| s.to_string()).collect(),
            star_count: doc.star_count,
        })
        .collect();

    // Step 4: Postings
    let mut postings: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for (i, doc) in docs.iter().enumerate() {
        let terms: BTreeSet<String> = tokenize(&doc.name)
            .chain(tokenize(&doc.package))
            .chain(tokenize(&doc.synopsis))
            .collect();
        for term in terms {
            postings.entry(term).or_default().push(i as u32);
        }
    }

    log::debug!(
        "Built index: {} docs, {} terms",
        hits.len(),
        postings.len()
    );
    Ok(TermStats::from_parts(hits, postings, now_micros()))
}
