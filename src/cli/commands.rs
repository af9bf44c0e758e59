//! CLI command implementations.

use std::path::Path;

use crate::config::IndexerConfig;
use crate::docdb::MemDb;
use crate::engine::{clear_outdated, run_indexer, RunLock};
use crate::format::ArtifactReader;
use crate::rank::package_show_name;
use crate::segment::{SegmentSet, SegmentState};
use crate::snapshot;
use crate::types::{DocRecord, IndexResult, INDEX_FILE_NAME};

/// Run one indexing pass followed by stale segment collection.
pub fn cmd_index(config: &IndexerConfig, json: bool) -> IndexResult<()> {
    let report = run_indexer(config)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_default()
        );
    } else {
        match &report.indexed {
            Some(r) => {
                println!(
                    "Indexed docdb {} into index {}",
                    r.input_generation, r.index_generation
                );
                println!("  Documents: {}", r.doc_count);
                println!("  Terms: {}", r.term_count);
                println!(
                    "  Input removed: {}",
                    if r.input_removed { "yes" } else { "no" }
                );
                println!("  Elapsed: {:.3} s", r.elapsed_micros as f64 / 1e6);
            }
            None => println!("Nothing to index"),
        }
        print_collect(&report.collected);
    }
    Ok(())
}

/// Run stale segment collection only.
pub fn cmd_clean(config: &IndexerConfig, json: bool) -> IndexResult<()> {
    let _lock = RunLock::acquire(&config.lock_path())?;
    let report = clear_outdated(&config.index_segments())?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_default()
        );
    } else {
        print_collect(&report);
    }
    Ok(())
}

fn print_collect(report: &crate::engine::CollectReport) {
    match report.kept {
        Some(generation) => println!("Current index: {}", generation),
        None => println!("No published index"),
    }
    if !report.removed.is_empty() {
        println!("  Removed: {:?}", report.removed);
    }
    if !report.failed.is_empty() {
        println!("  Failed to remove (retried next pass): {:?}", report.failed);
    }
}

/// List every segment of both kinds.
pub fn cmd_segments(config: &IndexerConfig, json: bool) -> IndexResult<()> {
    let sets = [config.docdb_segments(), config.index_segments()];

    if json {
        let mut out = Vec::new();
        for set in &sets {
            for segm in set.list_all()? {
                let mut info = serde_json::json!({
                    "kind": segm.kind().name(),
                    "generation": segm.generation(),
                    "state": segm.state().name(),
                    "path": segm.path().display().to_string(),
                });
                if let Some((docs, created_at, size)) = index_summary(set, segm.generation()) {
                    info["docs"] = docs.into();
                    info["created_at"] = created_at.into();
                    info["file_size"] = size.into();
                }
                out.push(info);
            }
        }
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
    } else {
        for set in &sets {
            let all = set.list_all()?;
            println!("{} ({}): {} segments", set.kind(), set.root().display(), all.len());
            for segm in all {
                print!("  {:>8}  {:<8}", segm.generation(), segm.state().name());
                if let Some((docs, created_at, size)) = index_summary(set, segm.generation()) {
                    print!(
                        "  {} docs, {}, built {}",
                        docs,
                        format_size(size),
                        format_timestamp(created_at)
                    );
                }
                println!();
            }
        }
    }
    Ok(())
}

/// Doc count, build time and file size of a done index segment.
fn index_summary(set: &SegmentSet, generation: u64) -> Option<(u64, u64, u64)> {
    let segm = set.segment(generation);
    if segm.state() != SegmentState::Done {
        return None;
    }
    let path = segm.join(INDEX_FILE_NAME);
    let header = ArtifactReader::read_header(&path).ok()?;
    let size = std::fs::metadata(&path).ok()?.len();
    Some((header.doc_count, header.created_at, size))
}

/// Write a JSON array of document records into a new done docdb segment.
pub fn cmd_import(config: &IndexerConfig, json_file: &Path, json: bool) -> IndexResult<()> {
    let text = std::fs::read_to_string(json_file)?;
    let docs: Vec<DocRecord> = serde_json::from_str(&text)?;
    let count = docs.len();

    let set = config.docdb_segments();
    let segm = set.gen_max_segment()?;
    MemDb::from_docs(docs).save(&segm)?;
    set.done(&segm)?;
    log::info!("Imported {} docs into {}", count, segm);

    if json {
        println!(
            "{}",
            serde_json::json!({"generation": segm.generation(), "docs": count})
        );
    } else {
        println!(
            "Imported {} docs into docdb segment {}",
            count,
            segm.generation()
        );
    }
    Ok(())
}

/// Print the leaderboards of the current index.
pub fn cmd_stats(config: &IndexerConfig, top: usize, json: bool) -> IndexResult<()> {
    snapshot::require_latest(&config.index_segments())?;
    let lists = snapshot::stat_tops(top);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&lists).unwrap_or_default()
        );
    } else {
        for list in &lists {
            println!("{} ({})", list.name, list.info);
            for (i, item) in list.items.iter().enumerate() {
                let target = item.link.as_deref().unwrap_or(&item.package);
                println!("  {:>3}. {:<30} {:<50} {}", i + 1, item.name, target, item.info);
            }
            println!();
        }
    }
    Ok(())
}

/// Print packages containing every query term.
pub fn cmd_search(
    config: &IndexerConfig,
    query: &str,
    limit: usize,
    json: bool,
) -> IndexResult<()> {
    let index = snapshot::require_latest(&config.index_segments())?;
    let ids = index.search(query);
    let hits: Vec<_> = ids.iter().filter_map(|&id| index.get(id)).take(limit).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&hits).unwrap_or_default());
    } else {
        for hit in &hits {
            println!(
                "{:<30} {} (score {:.2}, refs {}, stars {})",
                package_show_name(&hit.name, &hit.package),
                hit.package,
                hit.static_score,
                hit.imported_count(),
                hit.star_count
            );
        }
        println!("\n{} of {} results", hits.len(), ids.len());
    }
    Ok(())
}

/// Write a config file with every default spelled out.
pub fn cmd_init_config(config: &IndexerConfig, path: &Path) -> IndexResult<()> {
    config.save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Artifact size with a binary unit suffix.
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Build time of an artifact header, which stores epoch microseconds.
fn format_timestamp(micros: u64) -> String {
    i64::try_from(micros)
        .ok()
        .and_then(chrono::DateTime::from_timestamp_micros)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("{} us", micros))
}
