//! File header for .pidx index artifacts.

use std::io::{Read, Write};

use crate::types::error::{IndexError, IndexResult};
use crate::types::{FORMAT_VERSION, PIDX_MAGIC};

/// Header of a .pidx file. Fixed size: 64 bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArtifactHeader {
    /// Magic bytes: [0x50, 0x49, 0x44, 0x58] ("PIDX").
    pub magic: [u8; 4],
    /// Format version (currently 1).
    pub version: u32,
    /// Number of indexed documents.
    pub doc_count: u64,
    /// Number of distinct terms in the postings section.
    pub term_count: u64,
    /// When the artifact was written (Unix epoch microseconds).
    pub created_at: u64,
    /// Byte offset where the compressed hit section starts.
    pub hits_offset: u64,
    /// Length in bytes of the compressed hit section.
    pub hits_length: u64,
    /// Byte offset where the compressed postings section starts.
    pub postings_offset: u64,
    /// Length in bytes of the compressed postings section.
    pub postings_length: u64,
}

/// The fixed size of an ArtifactHeader on disk: 64 bytes.
pub const HEADER_SIZE: u64 = 64;

impl ArtifactHeader {
    /// Create an empty header with default magic and version.
    pub fn new() -> Self {
        Self {
            magic: PIDX_MAGIC,
            version: FORMAT_VERSION,
            doc_count: 0,
            term_count: 0,
            created_at: 0,
            hits_offset: HEADER_SIZE,
            hits_length: 0,
            postings_offset: HEADER_SIZE,
            postings_length: 0,
        }
    }

    /// Write this header to the given writer. Writes exactly 64 bytes.
    ///
    /// Layout (all little-endian):
    /// - 0x00..0x04: magic (4 bytes)
    /// - 0x04..0x08: version (u32)
    /// - 0x08..0x10: doc_count (u64)
    /// - 0x10..0x18: term_count (u64)
    /// - 0x18..0x20: created_at (u64)
    /// - 0x20..0x28: hits_offset (u64)
    /// - 0x28..0x30: hits_length (u64)
    /// - 0x30..0x38: postings_offset (u64)
    /// - 0x38..0x40: postings_length (u64)
    pub fn write_to(&self, writer: &mut impl Write) -> IndexResult<()> {
        writer.write_all(&self.magic)?;
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&self.doc_count.to_le_bytes())?;
        writer.write_all(&self.term_count.to_le_bytes())?;
        writer.write_all(&self.created_at.to_le_bytes())?;
        writer.write_all(&self.hits_offset.to_le_bytes())?;
        writer.write_all(&self.hits_length.to_le_bytes())?;
        writer.write_all(&self.postings_offset.to_le_bytes())?;
        writer.write_all(&self.postings_length.to_le_bytes())?;
        Ok(())
    }

    /// Read a header from the given reader. Reads exactly 64 bytes.
    pub fn read_from(reader: &mut impl Read) -> IndexResult<Self> {
        let mut buf = [0u8; 64];
        reader.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                IndexError::Truncated
            } else {
                IndexError::Io(e)
            }
        })?;

        let magic = [buf[0], buf[1], buf[2], buf[3]];
        if magic != PIDX_MAGIC {
            return Err(IndexError::InvalidMagic);
        }

        let version = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        if version != FORMAT_VERSION {
            return Err(IndexError::UnsupportedVersion(version));
        }

        Ok(Self {
            magic,
            version,
            doc_count: read_u64(&buf, 8),
            term_count: read_u64(&buf, 16),
            created_at: read_u64(&buf, 24),
            hits_offset: read_u64(&buf, 32),
            hits_length: read_u64(&buf, 40),
            postings_offset: read_u64(&buf, 48),
            postings_length: read_u64(&buf, 56),
        })
    }
}

impl Default for ArtifactHeader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_u64(buf: &[u8; 64], at: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(bytes)
}
