//! Phase 2 tests: Document databases, index build, artifact format, pipeline.

use std::fs;
use std::io::Cursor;

use tempfile::TempDir;

use pkg_index::docdb::MemDb;
use pkg_index::engine::{clear_outdated, IndexPipeline};
use pkg_index::format::{ArtifactReader, ArtifactWriter};
use pkg_index::index::build_index;
use pkg_index::segment::{Segment, SegmentKind, SegmentSet, SegmentState};
use pkg_index::types::header::{ArtifactHeader, HEADER_SIZE};
use pkg_index::types::{DocRecord, IndexError, DOCS_FILE_NAME, INDEX_FILE_NAME, PIDX_MAGIC};

// ==================== Helpers ====================

struct Fixture {
    _dir: TempDir,
    docdb: SegmentSet,
    index: SegmentSet,
}

impl Fixture {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = TempDir::new().unwrap();
        let docdb = SegmentSet::new(SegmentKind::DocDb, dir.path().join("docdb"));
        let index = SegmentSet::new(SegmentKind::Index, dir.path().join("index"));
        Self {
            _dir: dir,
            docdb,
            index,
        }
    }

    fn pipeline(&self) -> IndexPipeline {
        IndexPipeline::new(self.docdb.clone(), self.index.clone())
    }

    /// Write docs into a new docdb segment and mark it done.
    fn crawl(&self, docs: Vec<DocRecord>) -> Segment {
        let segm = self.docdb.gen_max_segment().unwrap();
        MemDb::from_docs(docs).save(&segm).unwrap();
        self.docdb.done(&segm).unwrap();
        segm
    }

    fn done_index_count(&self) -> usize {
        self.index
            .list_all()
            .unwrap()
            .iter()
            .filter(|s| s.is_done())
            .count()
    }
}

fn sample_docs() -> Vec<DocRecord> {
    vec![
        DocRecord::new("github.com/acme/log", "log")
            .synopsis("Structured logging")
            .star_count(120),
        DocRecord::new("github.com/acme/web", "web")
            .synopsis("Web framework with structured routing")
            .imports(["github.com/acme/log", "net/http"])
            .star_count(300),
        DocRecord::new("github.com/acme/cli", "main")
            .imports(["github.com/acme/log", "github.com/acme/web"])
            .star_count(5),
        DocRecord::new("bitbucket.org/zed/json", "json")
            .synopsis("Fast JSON codec")
            .imports(["github.com/acme/log", "bitbucket.org/zed/json"]),
        DocRecord::new("net/http", "http").synopsis("HTTP client and server"),
    ]
}

// ==================== Document Database ====================

#[test]
fn test_docdb_save_load() {
    let fx = Fixture::new();
    let segm = fx.crawl(sample_docs());

    let db = MemDb::load(&segm).unwrap();
    assert_eq!(db.len(), 5);
    assert_eq!(db.docs(), sample_docs().as_slice());
}

#[test]
fn test_docdb_skips_blank_lines_and_defaults_fields() {
    let fx = Fixture::new();
    let segm = fx.docdb.gen_max_segment().unwrap();
    fs::write(
        segm.join(DOCS_FILE_NAME),
        "{\"package\":\"fmt\"}\n\n   \n{\"package\":\"os\",\"name\":\"os\"}\n",
    )
    .unwrap();

    let db = MemDb::load(&segm).unwrap();
    assert_eq!(db.len(), 2);
    assert_eq!(db.docs()[0].name, "");
    assert!(db.docs()[0].imports.is_empty());
    assert_eq!(db.docs()[1].name, "os");
}

#[test]
fn test_docdb_missing_file_is_empty() {
    let fx = Fixture::new();
    let segm = fx.docdb.gen_max_segment().unwrap();
    assert!(MemDb::load(&segm).unwrap().is_empty());
}

#[test]
fn test_docdb_malformed_line() {
    let fx = Fixture::new();
    let segm = fx.docdb.gen_max_segment().unwrap();
    fs::write(segm.join(DOCS_FILE_NAME), "{\"package\":\"fmt\"}\nnot json\n").unwrap();

    match MemDb::load(&segm) {
        Err(IndexError::Json(_)) => {}
        other => panic!("Expected Json error, got {:?}", other),
    }
}

// ==================== Index Build ====================

#[test]
fn test_build_computes_imported() {
    let stats = build_index(&MemDb::from_docs(sample_docs())).unwrap();
    assert_eq!(stats.doc_count(), 5);

    let log = stats.get(0).unwrap();
    assert_eq!(log.package, "github.com/acme/log");
    assert_eq!(
        log.imported,
        vec![
            "bitbucket.org/zed/json".to_string(),
            "github.com/acme/cli".to_string(),
            "github.com/acme/web".to_string(),
        ]
    );

    // Self-imports are ignored.
    assert!(stats.get(3).unwrap().imported.is_empty());
    // Imports of packages outside the batch do not matter.
    assert_eq!(
        stats.get(4).unwrap().imported,
        vec!["github.com/acme/web".to_string()]
    );
}

#[test]
fn test_build_static_scores() {
    let stats = build_index(&MemDb::from_docs(sample_docs())).unwrap();
    let log = stats.get(0).unwrap();
    let cli = stats.get(2).unwrap();
    assert!(log.static_score > cli.static_score);
    assert!(cli.static_score >= 1.0);
    assert_eq!(log.star_count, 120);
}

#[test]
fn test_build_duplicate_imports_counted_once() {
    let docs = vec![
        DocRecord::new("a.com/x", "x"),
        DocRecord::new("a.com/y", "y").imports(["a.com/x", "a.com/x"]),
    ];
    let stats = build_index(&MemDb::from_docs(docs)).unwrap();
    assert_eq!(stats.get(0).unwrap().imported_count(), 1);
}

#[test]
fn test_build_postings_and_search() {
    let stats = build_index(&MemDb::from_docs(sample_docs())).unwrap();

    assert_eq!(stats.postings_for("structured"), &[0, 1]);
    assert_eq!(stats.search("Structured"), vec![0, 1]);
    assert_eq!(stats.search("structured web"), vec![1]);
    assert_eq!(stats.search("acme"), vec![0, 1, 2]);
    assert!(stats.search("structured json").is_empty());
    assert!(stats.search("").is_empty());
    assert!(stats.search("nonexistent").is_empty());
}

#[test]
fn test_build_rejects_empty_package() {
    let docs = vec![DocRecord::new("a.com/x", "x"), DocRecord::new("  ", "bad")];
    match build_index(&MemDb::from_docs(docs)) {
        Err(IndexError::EmptyPackage { record }) => assert_eq!(record, 2),
        other => panic!("Expected EmptyPackage error, got {:?}", other),
    }
}

#[test]
fn test_empty_package_reports_record_position() {
    let fx = Fixture::new();
    let segm = fx.docdb.gen_max_segment().unwrap();
    // The nameless record sits on file line 4 but is the third record.
    fs::write(
        segm.join(DOCS_FILE_NAME),
        "{\"package\":\"fmt\"}\n\n{\"package\":\"os\"}\n{\"package\":\"\"}\n",
    )
    .unwrap();

    let db = MemDb::load(&segm).unwrap();
    match build_index(&db) {
        Err(IndexError::EmptyPackage { record }) => assert_eq!(record, 3),
        other => panic!("Expected EmptyPackage error, got {:?}", other),
    }
}

#[test]
fn test_build_rejects_duplicate_package() {
    let docs = vec![DocRecord::new("a.com/x", "x"), DocRecord::new("a.com/x", "x2")];
    match build_index(&MemDb::from_docs(docs)) {
        Err(IndexError::DuplicatePackage(p)) => assert_eq!(p, "a.com/x"),
        other => panic!("Expected DuplicatePackage error, got {:?}", other),
    }
}

#[test]
fn test_build_empty_db() {
    let stats = build_index(&MemDb::new()).unwrap();
    assert_eq!(stats.doc_count(), 0);
    assert_eq!(stats.term_count(), 0);
    assert_eq!(stats.scan().count(), 0);
}

// ==================== Artifact Format ====================

#[test]
fn test_artifact_write_read() {
    let stats = build_index(&MemDb::from_docs(sample_docs())).unwrap();

    let mut buf = Vec::new();
    ArtifactWriter::write_to(&stats, &mut buf).unwrap();
    let read = ArtifactReader::read_from(&mut Cursor::new(&buf)).unwrap();
    assert_eq!(read, stats);
}

#[test]
fn test_artifact_file_and_header() {
    let fx = Fixture::new();
    let stats = build_index(&MemDb::from_docs(sample_docs())).unwrap();
    let segm = fx.index.gen_max_segment().unwrap();
    let path = segm.join(INDEX_FILE_NAME);

    ArtifactWriter::write_to_file(&stats, &path).unwrap();

    let header = ArtifactReader::read_header(&path).unwrap();
    assert_eq!(header.magic, PIDX_MAGIC);
    assert_eq!(header.doc_count, 5);
    assert_eq!(header.term_count, stats.term_count() as u64);
    assert_eq!(header.created_at, stats.created_at());
    assert_eq!(header.hits_offset, HEADER_SIZE);
    assert_eq!(header.postings_offset, HEADER_SIZE + header.hits_length);
    assert_eq!(
        fs::metadata(&path).unwrap().len(),
        header.postings_offset + header.postings_length
    );

    let read = ArtifactReader::read_from_file(&path).unwrap();
    assert_eq!(read.scan().count(), 5);
    assert_eq!(read, stats);
}

#[test]
fn test_artifact_header_roundtrip() {
    let header = ArtifactHeader {
        doc_count: 42,
        term_count: 7,
        created_at: 1_700_000_000_000_000,
        hits_length: 100,
        postings_offset: 164,
        postings_length: 30,
        ..ArtifactHeader::new()
    };
    let mut buf = Vec::new();
    header.write_to(&mut buf).unwrap();
    assert_eq!(buf.len() as u64, HEADER_SIZE);
    assert_eq!(ArtifactHeader::read_from(&mut Cursor::new(&buf)).unwrap(), header);
}

#[test]
fn test_artifact_invalid_magic() {
    let mut buf = Vec::new();
    ArtifactWriter::write_to(&build_index(&MemDb::new()).unwrap(), &mut buf).unwrap();
    buf[0] = b'X';
    match ArtifactReader::read_from(&mut Cursor::new(&buf)) {
        Err(IndexError::InvalidMagic) => {}
        other => panic!("Expected InvalidMagic, got {:?}", other),
    }
}

#[test]
fn test_artifact_unsupported_version() {
    let mut buf = Vec::new();
    ArtifactWriter::write_to(&build_index(&MemDb::new()).unwrap(), &mut buf).unwrap();
    buf[4..8].copy_from_slice(&99u32.to_le_bytes());
    match ArtifactReader::read_from(&mut Cursor::new(&buf)) {
        Err(IndexError::UnsupportedVersion(99)) => {}
        other => panic!("Expected UnsupportedVersion, got {:?}", other),
    }
}

#[test]
fn test_artifact_truncated() {
    let stats = build_index(&MemDb::from_docs(sample_docs())).unwrap();
    let mut buf = Vec::new();
    ArtifactWriter::write_to(&stats, &mut buf).unwrap();

    for len in [0, 10, 63, buf.len() - 1] {
        match ArtifactReader::read_from(&mut Cursor::new(&buf[..len])) {
            Err(IndexError::Truncated) => {}
            other => panic!("Expected Truncated at {}, got {:?}", len, other),
        }
    }
}

#[test]
fn test_artifact_corrupt_counts() {
    let stats = build_index(&MemDb::from_docs(sample_docs())).unwrap();
    let mut buf = Vec::new();
    ArtifactWriter::write_to(&stats, &mut buf).unwrap();
    // Claim more documents than the hit section holds.
    buf[8..16].copy_from_slice(&1000u64.to_le_bytes());
    assert!(matches!(
        ArtifactReader::read_from(&mut Cursor::new(&buf)),
        Err(IndexError::Corrupt(_))
    ));
}

#[test]
fn test_artifact_write_to_directory_fails() {
    let fx = Fixture::new();
    let segm = fx.index.gen_max_segment().unwrap();
    fs::create_dir(segm.join(INDEX_FILE_NAME)).unwrap();
    let stats = build_index(&MemDb::new()).unwrap();

    assert!(matches!(
        ArtifactWriter::write_to_file(&stats, &segm.join(INDEX_FILE_NAME)),
        Err(IndexError::Io(_))
    ));
}

// ==================== Pipeline ====================

#[test]
fn test_pipeline_success() {
    let fx = Fixture::new();
    let input = fx.crawl(sample_docs());

    let report = fx.pipeline().run(&input).unwrap();
    assert_eq!(report.input_generation, 1);
    assert_eq!(report.index_generation, 1);
    assert_eq!(report.doc_count, 5);
    assert!(report.input_removed);

    // Exactly one new done index segment, scanning to M records.
    assert_eq!(fx.done_index_count(), 1);
    let published = fx.index.find_max_done().unwrap().unwrap();
    let stats = ArtifactReader::read_from_file(&published.join(INDEX_FILE_NAME)).unwrap();
    assert_eq!(stats.scan().count(), 5);
    assert_eq!(stats.term_count(), report.term_count);

    // The input no longer exists.
    assert_eq!(input.state(), SegmentState::Removed);
    assert!(fx.docdb.list_all().unwrap().is_empty());
}

#[test]
fn test_pipeline_build_failure_is_non_destructive() {
    let fx = Fixture::new();
    let input = fx.crawl(vec![
        DocRecord::new("a.com/x", "x"),
        DocRecord::new("a.com/x", "again"),
    ]);

    let result = fx.pipeline().run(&input);
    assert!(matches!(result, Err(IndexError::DuplicatePackage(_))));

    assert_eq!(input.state(), SegmentState::Done);
    assert_eq!(fx.done_index_count(), 0);
    // The allocated output stays behind, unpublished.
    let leftovers = fx.index.list_all().unwrap();
    assert_eq!(leftovers.len(), 1);
    assert_eq!(leftovers[0].state(), SegmentState::Building);
    assert!(!leftovers[0].join(INDEX_FILE_NAME).exists());
}

#[test]
fn test_pipeline_load_failure_is_non_destructive() {
    let fx = Fixture::new();
    let input = fx.docdb.gen_max_segment().unwrap();
    fs::write(input.join(DOCS_FILE_NAME), "{broken\n").unwrap();
    fx.docdb.done(&input).unwrap();

    assert!(matches!(fx.pipeline().run(&input), Err(IndexError::Json(_))));
    assert_eq!(input.state(), SegmentState::Done);
    assert_eq!(fx.done_index_count(), 0);
}

#[test]
fn test_pipeline_rejects_unfinished_input() {
    let fx = Fixture::new();
    let input = fx.docdb.gen_max_segment().unwrap();
    MemDb::from_docs(sample_docs()).save(&input).unwrap();

    assert!(matches!(fx.pipeline().run(&input), Err(IndexError::Build(_))));
    assert_eq!(input.state(), SegmentState::Building);
    assert!(fx.index.list_all().unwrap().is_empty());
}

#[test]
fn test_pipeline_allocation_failure() {
    let fx = Fixture::new();
    let input = fx.crawl(sample_docs());
    fs::write(fx.index.root(), b"not a directory").unwrap();

    assert!(matches!(
        fx.pipeline().run(&input),
        Err(IndexError::Allocation { .. })
    ));
    assert_eq!(input.state(), SegmentState::Done);
}

#[test]
fn test_pipeline_retry_after_failure_then_collect() {
    let fx = Fixture::new();
    let bad = fx.crawl(vec![DocRecord::new("", "nameless")]);
    assert!(fx.pipeline().run(&bad).is_err());
    fx.docdb.remove(&bad).unwrap();

    let good = fx.crawl(sample_docs());
    let report = fx.pipeline().run(&good).unwrap();
    // Generation 1 is the abandoned partial output.
    assert_eq!(report.index_generation, 2);

    let collected = clear_outdated(&fx.index).unwrap();
    assert_eq!(collected.kept, Some(2));
    assert_eq!(collected.removed, vec![1]);
}

#[test]
fn test_pipeline_successive_runs() {
    let fx = Fixture::new();
    let first = fx.crawl(sample_docs());
    fx.pipeline().run(&first).unwrap();

    let mut docs = sample_docs();
    docs.push(DocRecord::new("gitlab.com/new/pkg", "pkg"));
    let second = fx.crawl(docs);
    let report = fx.pipeline().run(&second).unwrap();
    assert_eq!(report.index_generation, 2);
    assert_eq!(report.doc_count, 6);
    assert_eq!(fx.done_index_count(), 2);

    clear_outdated(&fx.index).unwrap();
    let remaining = fx.index.list_all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].generation(), 2);
}
