//! Leaderboard statistics over a published index.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::index::TermStats;
use crate::types::HitInfo;

use super::top_n::TopN;

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatItem {
    /// Display name.
    pub name: String,
    /// Package path; empty for rows that are not packages.
    pub package: String,
    /// External link, for rows that are not packages.
    pub link: Option<String>,
    /// Preformatted numbers shown next to the row.
    pub info: String,
}

/// A named leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatList {
    pub name: String,
    /// Describes the columns of `StatItem::info`.
    pub info: String,
    pub items: Vec<StatItem>,
}

/// Build the "Hot", "Most Imported" and "Sites" leaderboards, `n` rows each.
///
/// The index is scanned once; all three selectors are fed from that scan.
pub fn stat_tops(index: &TermStats, n: usize) -> Vec<StatList> {
    let mut top_static_scores = TopN::new(n, |a: &HitInfo, b: &HitInfo| {
        by_static_score(a, b).then_with(|| b.package.cmp(&a.package))
    });
    let mut top_imported = TopN::new(n, |a: &HitInfo, b: &HitInfo| {
        a.imported_count()
            .cmp(&b.imported_count())
            .then_with(|| b.package.cmp(&a.package))
    });
    let mut sites: BTreeMap<String, usize> = BTreeMap::new();

    for (_, hit) in index.scan() {
        let mut hit = hit.clone();
        hit.name = package_show_name(&hit.name, &hit.package);

        if let Some(host) = host_of_package(&hit.package) {
            *sites.entry(host).or_insert(0) += 1;
        }

        top_static_scores.append(hit.clone());
        top_imported.append(hit);
    }

    let hot = StatList {
        name: "Hot".to_string(),
        info: "refs stars".to_string(),
        items: top_static_scores
            .pop_all()
            .into_iter()
            .map(|hit| StatItem {
                info: format!("{} {}", hit.imported_count(), hit.star_count),
                name: hit.name,
                package: hit.package,
                link: None,
            })
            .collect(),
    };

    let most_imported = StatList {
        name: "Most Imported".to_string(),
        info: "refs".to_string(),
        items: top_imported
            .pop_all()
            .into_iter()
            .map(|hit| StatItem {
                info: hit.imported_count().to_string(),
                name: hit.name,
                package: hit.package,
                link: None,
            })
            .collect(),
    };

    let mut top_sites = TopN::new(n, |a: &(String, usize), b: &(String, usize)| {
        a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0))
    });
    for site in sites {
        top_sites.append(site);
    }
    let site_list = StatList {
        name: "Sites".to_string(),
        info: "packages".to_string(),
        items: top_sites
            .pop_all()
            .into_iter()
            .map(|(host, count)| StatItem {
                link: Some(format!("http://{}", host)),
                name: host,
                package: String::new(),
                info: count.to_string(),
            })
            .collect(),
    };

    vec![hot, most_imported, site_list]
}

/// How a package is shown in listings.
///
/// `main` packages are shown with their directory, unnamed ones with the
/// directory in parentheses.
pub fn package_show_name(name: &str, package: &str) -> String {
    let project = package.rsplit('/').next().unwrap_or(package);
    match name {
        "" => format!("({})", project),
        "main" => format!("main - {}", project),
        _ => name.to_string(),
    }
}

/// Lowercased hosting site of a package path, e.g. `github.com`.
///
/// Paths whose first element has no dot (the standard library) have no host.
pub fn host_of_package(package: &str) -> Option<String> {
    let first = package.split('/').next()?;
    if first.contains('.') {
        Some(first.to_lowercase())
    } else {
        None
    }
}

/// Orders hits by static score, for callers building their own selectors.
pub fn by_static_score(a: &HitInfo, b: &HitInfo) -> Ordering {
    a.static_score.total_cmp(&b.static_score)
}
