//! Document-database segments: crawled records stored as JSON lines.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use crate::segment::Segment;
use crate::types::{DocRecord, IndexResult, DOCS_FILE_NAME};

/// All records of one document-database segment, held in memory.
#[derive(Debug, Default)]
pub struct MemDb {
    docs: Vec<DocRecord>,
}

impl MemDb {
    /// Create a new, empty database.
    pub fn new() -> Self {
        Self { docs: Vec::new() }
    }

    /// Create from pre-existing records.
    pub fn from_docs(docs: Vec<DocRecord>) -> Self {
        Self { docs }
    }

    /// Read every record of a segment. Blank lines are skipped; a
    /// missing docs file means an empty segment.
    pub fn load(segment: &Segment) -> IndexResult<Self> {
        let path = segment.join(DOCS_FILE_NAME);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };

        let mut docs = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            docs.push(serde_json::from_str(&line)?);
        }
        Ok(Self { docs })
    }

    /// Write every record into the segment, replacing any previous docs file.
    pub fn save(&self, segment: &Segment) -> IndexResult<()> {
        let file = File::create(segment.join(DOCS_FILE_NAME))?;
        let mut writer = BufWriter::new(file);
        for doc in &self.docs {
            serde_json::to_writer(&mut writer, doc)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }

    /// Append a record.
    pub fn push(&mut self, doc: DocRecord) {
        self.docs.push(doc);
    }

    pub fn docs(&self) -> &[DocRecord] {
        &self.docs
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
