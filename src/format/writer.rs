//! Writes .pidx files from in-memory term statistics.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::index::TermStats;
use crate::types::error::IndexResult;
use crate::types::header::{ArtifactHeader, HEADER_SIZE};
use crate::types::{HitInfo, FORMAT_VERSION, PIDX_MAGIC};

use super::compression::compress_section;

/// Writer for .pidx index artifacts.
pub struct ArtifactWriter;

impl ArtifactWriter {
    /// Write term statistics to a new file at `path`.
    ///
    /// The file handle is owned by this call and closed on every return
    /// path. Data is flushed and synced before returning `Ok`.
    pub fn write_to_file(stats: &TermStats, path: &Path) -> IndexResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(stats, &mut writer)?;
        writer.get_ref().sync_all()?;
        Ok(())
    }

    /// Write term statistics to any writer.
    pub fn write_to(stats: &TermStats, writer: &mut impl Write) -> IndexResult<()> {
        // Step 1: Encode and compress sections
        let mut hits_buf: Vec<u8> = Vec::new();
        for hit in stats.hits() {
            encode_hit(&mut hits_buf, hit);
        }
        let hits = compress_section(&hits_buf);
        drop(hits_buf);

        let mut postings_buf: Vec<u8> = Vec::new();
        for (term, ids) in stats.postings() {
            put_str(&mut postings_buf, term);
            postings_buf.extend_from_slice(&(ids.len() as u32).to_le_bytes());
            for id in ids {
                postings_buf.extend_from_slice(&id.to_le_bytes());
            }
        }
        let postings = compress_section(&postings_buf);
        drop(postings_buf);

        // Step 2: Header
        let hits_offset = HEADER_SIZE;
        let postings_offset = hits_offset + hits.len() as u64;
        let header = ArtifactHeader {
            magic: PIDX_MAGIC,
            version: FORMAT_VERSION,
            doc_count: stats.doc_count() as u64,
            term_count: stats.term_count() as u64,
            created_at: stats.created_at(),
            hits_offset,
            hits_length: hits.len() as u64,
            postings_offset,
            postings_length: postings.len() as u64,
        };
        header.write_to(writer)?;

        // Step 3: Sections
        writer.write_all(&hits)?;
        writer.write_all(&postings)?;

        writer.flush()?;
        Ok(())
    }
}

/// Hit record layout: name, package, static_score (f32), star_count (u32),
/// imported count (u32), then each importer.
fn encode_hit(buf: &mut Vec<u8>, hit: &HitInfo) {
    put_str(buf, &hit.name);
    put_str(buf, &hit.package);
    buf.extend_from_slice(&hit.static_score.to_le_bytes());
    buf.extend_from_slice(&hit.star_count.to_le_bytes());
    buf.extend_from_slice(&(hit.imported.len() as u32).to_le_bytes());
    for importer in &hit.imported {
        put_str(buf, importer);
    }
}

/// Length-prefixed (u32) UTF-8 string.
fn put_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}
