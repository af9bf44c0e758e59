//! Reads .pidx files into in-memory term statistics.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;

use crate::index::TermStats;
use crate::types::error::{IndexError, IndexResult};
use crate::types::header::{ArtifactHeader, HEADER_SIZE};
use crate::types::HitInfo;

use super::compression::decompress_section;

/// Reader for .pidx index artifacts.
pub struct ArtifactReader;

impl ArtifactReader {
    /// Map a .pidx file and decode it.
    pub fn read_from_file(path: &Path) -> IndexResult<TermStats> {
        let file = std::fs::File::open(path)?;
        // The artifact lives in a done segment and is never rewritten in place.
        let mmap = unsafe { Mmap::map(&file)? };
        decode(&mmap)
    }

    /// Read from any reader.
    pub fn read_from(reader: &mut impl Read) -> IndexResult<TermStats> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        decode(&data)
    }

    /// Read only the header of a .pidx file.
    pub fn read_header(path: &Path) -> IndexResult<ArtifactHeader> {
        let mut file = std::fs::File::open(path)?;
        ArtifactHeader::read_from(&mut file)
    }
}

fn decode(data: &[u8]) -> IndexResult<TermStats> {
    if (data.len() as u64) < HEADER_SIZE {
        return Err(IndexError::Truncated);
    }
    let header = ArtifactHeader::read_from(&mut &data[..HEADER_SIZE as usize])?;

    // Hit section
    let hits_raw = decompress_section(section(data, header.hits_offset, header.hits_length)?)?;
    let mut cursor = ByteCursor::new(&hits_raw);
    let mut hits = Vec::with_capacity((header.doc_count as usize).min(hits_raw.len()));
    for _ in 0..header.doc_count {
        hits.push(decode_hit(&mut cursor)?);
    }

    // Postings section
    let postings_raw = decompress_section(section(
        data,
        header.postings_offset,
        header.postings_length,
    )?)?;
    let mut cursor = ByteCursor::new(&postings_raw);
    let mut postings = BTreeMap::new();
    for _ in 0..header.term_count {
        let term = cursor.get_str()?;
        let count = cursor.get_u32()? as usize;
        let mut ids = Vec::with_capacity(count.min(hits.len()));
        for _ in 0..count {
            let id = cursor.get_u32()?;
            if id as u64 >= header.doc_count {
                return Err(IndexError::Corrupt(cursor.pos as u64));
            }
            ids.push(id);
        }
        postings.insert(term, ids);
    }

    Ok(TermStats::from_parts(hits, postings, header.created_at))
}

fn section(data: &[u8], offset: u64, length: u64) -> IndexResult<&[u8]> {
    let start = offset as usize;
    let end = start.checked_add(length as usize).ok_or(IndexError::Corrupt(offset))?;
    if end > data.len() {
        return Err(IndexError::Truncated);
    }
    Ok(&data[start..end])
}

fn decode_hit(cursor: &mut ByteCursor<'_>) -> IndexResult<HitInfo> {
    let name = cursor.get_str()?;
    let package = cursor.get_str()?;
    let static_score = f32::from_bits(cursor.get_u32()?);
    let star_count = cursor.get_u32()?;
    let imported_count = cursor.get_u32()? as usize;
    let mut imported = Vec::with_capacity(imported_count.min(1024));
    for _ in 0..imported_count {
        imported.push(cursor.get_str()?);
    }
    Ok(HitInfo {
        name,
        package,
        static_score,
        imported,
        star_count,
    })
}

/// Bounds-checked little-endian reads over a decompressed section.
struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> IndexResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(IndexError::Corrupt(self.pos as u64))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn get_u32(&mut self) -> IndexResult<u32> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(bytes))
    }

    fn get_str(&mut self) -> IndexResult<String> {
        let len = self.get_u32()? as usize;
        let at = self.pos as u64;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| IndexError::Corrupt(at))
    }
}
