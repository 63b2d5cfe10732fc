//! Integration tests for the dblpgraph extraction pass.
//!
//! These tests drive `run_extraction` end to end: a tagged DBLP text fixture
//! is written to a temp file (plain or bzip2), the pass runs, and the three
//! TSV outputs are read back and checked.
//!
//! # Sample Data
//!
//! `sample_dump()` holds four publications:
//! - "Alice", "Bob" -- VLDB 2000
//! - "Carol", "Alice", "Dave" -- ICDE 2001
//! - "Eve", "Bob" -- an unlisted venue (Workshop X) 2002
//! - "Frank" -- VLDB, no title line (dropped)
//!
//! plus noise lines the parser must ignore.

use bzip2::write::BzEncoder;
use bzip2::Compression;
use dblpgraph::emit::OutputPaths;
use dblpgraph::extract::{run_extraction, ExtractConfig};
use dblpgraph::models::VenueFilter;
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

fn sample_dump() -> &'static str {
    "<dblp>\n\
     Author: Alice\n\
     Author: Bob\n\
     Title: Scaling joins.\n\
     Pages: 1-12\n\
     Year: 2000\n\
     Booktitle: VLDB\n\
     Author: Carol\n\
     Author: Alice\n\
     Author: Dave\n\
     Title: Query rewriting.\n\
     Year: 2001\n\
     Booktitle: ICDE\n\
     Author: Eve\n\
     Author: Bob\n\
     Title: Notes.\n\
     Year: 2002\n\
     Booktitle: Workshop X\n\
     Author: Frank\n\
     Year: 2003\n\
     Booktitle: VLDB\n\
     </dblp>\n"
}

fn create_plain(text: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(text.as_bytes()).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn create_bz2(text: &str) -> NamedTempFile {
    let mut encoder = BzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(text.as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    let mut tmp = tempfile::Builder::new().suffix(".txt.bz2").tempfile().unwrap();
    tmp.write_all(&compressed).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn outputs_in(dir: &Path) -> OutputPaths {
    OutputPaths {
        graph: dir.join("dblp_graph"),
        authors: dir.join("dblp_authors_ids"),
        author_venues: dir.join("dblp_authors_conf"),
    }
}

fn config(input: &Path, dir: &Path, venues: VenueFilter) -> ExtractConfig {
    ExtractConfig {
        input: input.to_path_buf(),
        outputs: outputs_in(dir),
        venues,
        limit: None,
        dry_run: false,
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn db_venues() -> VenueFilter {
    VenueFilter::from_names(["VLDB", "ICDE"])
}

// ---------------------------------------------------------------------------
// Worked examples
// ---------------------------------------------------------------------------

const SINGLE_RECORD: &str = "Author: A\nAuthor: B\nTitle: T\nYear: 2000\nBooktitle: VLDB\n";

#[test]
fn single_accepted_record() {
    let input = create_plain(SINGLE_RECORD);
    let out = TempDir::new().unwrap();
    let paths = outputs_in(out.path());

    let stats = run_extraction(config(
        input.path(),
        out.path(),
        VenueFilter::from_names(["VLDB"]),
    ))
    .unwrap();

    assert_eq!(read(&paths.graph), "0\t1\t2000\n");
    assert_eq!(read(&paths.author_venues), "0\tVLDB\n1\tVLDB\n");
    assert_eq!(read(&paths.authors), "0\tA\n1\tB\n");
    assert_eq!(stats.records(), 1);
    assert_eq!(stats.accepted(), 1);
}

#[test]
fn single_rejected_record_leaves_outputs_empty() {
    let input = create_plain(SINGLE_RECORD);
    let out = TempDir::new().unwrap();
    let paths = outputs_in(out.path());

    let stats = run_extraction(config(
        input.path(),
        out.path(),
        VenueFilter::from_names(["SIGMOD Conference"]),
    ))
    .unwrap();

    assert_eq!(read(&paths.graph), "");
    assert_eq!(read(&paths.author_venues), "");
    assert_eq!(read(&paths.authors), "");
    // ids 0 and 1 were still consumed
    assert_eq!(stats.authors(), 2);
    assert_eq!(stats.authors_written(), 0);
}

// ---------------------------------------------------------------------------
// Sample dump
// ---------------------------------------------------------------------------

#[test]
fn sample_dump_with_database_venues() {
    let input = create_plain(sample_dump());
    let out = TempDir::new().unwrap();
    let paths = outputs_in(out.path());

    let stats = run_extraction(config(input.path(), out.path(), db_venues())).unwrap();

    // Alice=0 Bob=1 Carol=2 Dave=3 Eve=4 Frank=5
    assert_eq!(
        read(&paths.graph),
        "0\t1\t2000\n2\t0\t2001\n2\t3\t2001\n0\t3\t2001\n"
    );
    assert_eq!(
        read(&paths.author_venues),
        "0\tVLDB\n1\tVLDB\n2\tICDE\n0\tICDE\n3\tICDE\n"
    );
    assert_eq!(read(&paths.authors), "0\tAlice\n1\tBob\n2\tCarol\n3\tDave\n");

    assert_eq!(stats.records(), 4);
    assert_eq!(stats.accepted(), 2);
    assert_eq!(stats.filtered(), 1);
    assert_eq!(stats.untitled(), 1);
    assert_eq!(stats.edges(), 4);
    assert_eq!(stats.memberships(), 5);
    assert_eq!(stats.authors(), 6);
    assert_eq!(stats.authors_written(), 4);
}

#[test]
fn sample_dump_accept_all() {
    let input = create_plain(sample_dump());
    let out = TempDir::new().unwrap();
    let paths = outputs_in(out.path());

    let stats = run_extraction(config(
        input.path(),
        out.path(),
        VenueFilter::accept_all(),
    ))
    .unwrap();

    assert_eq!(stats.accepted(), 3);
    assert!(read(&paths.graph).ends_with("4\t1\t2002\n"));
    assert!(read(&paths.author_venues).contains("4\tWorkshop X\n"));
    // Frank's record has no title
    assert!(!read(&paths.authors).contains("Frank"));
    assert!(read(&paths.authors).contains("4\tEve\n"));
}

#[test]
fn bz2_input_matches_plain_input() {
    let plain = create_plain(sample_dump());
    let compressed = create_bz2(sample_dump());
    let out_plain = TempDir::new().unwrap();
    let out_bz2 = TempDir::new().unwrap();

    run_extraction(config(plain.path(), out_plain.path(), db_venues())).unwrap();
    run_extraction(config(compressed.path(), out_bz2.path(), db_venues())).unwrap();

    let a = outputs_in(out_plain.path());
    let b = outputs_in(out_bz2.path());
    assert_eq!(read(&a.graph), read(&b.graph));
    assert_eq!(read(&a.authors), read(&b.authors));
    assert_eq!(read(&a.author_venues), read(&b.author_venues));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn reruns_are_byte_identical() {
    let input = create_plain(sample_dump());
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    run_extraction(config(input.path(), first.path(), db_venues())).unwrap();
    run_extraction(config(input.path(), second.path(), db_venues())).unwrap();

    let a = outputs_in(first.path());
    let b = outputs_in(second.path());
    assert_eq!(fs::read(&a.graph).unwrap(), fs::read(&b.graph).unwrap());
    assert_eq!(fs::read(&a.authors).unwrap(), fs::read(&b.authors).unwrap());
    assert_eq!(
        fs::read(&a.author_venues).unwrap(),
        fs::read(&b.author_venues).unwrap()
    );
}

#[test]
fn author_table_matches_referenced_ids() {
    let input = create_plain(sample_dump());
    let out = TempDir::new().unwrap();
    let paths = outputs_in(out.path());

    run_extraction(config(input.path(), out.path(), db_venues())).unwrap();

    let mut referenced = BTreeSet::new();
    for line in read(&paths.graph).lines() {
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields.len(), 3);
        referenced.insert(fields[0].parse::<u32>().unwrap());
        referenced.insert(fields[1].parse::<u32>().unwrap());
    }
    for line in read(&paths.author_venues).lines() {
        referenced.insert(line.split('\t').next().unwrap().parse::<u32>().unwrap());
    }

    let listed: BTreeSet<u32> = read(&paths.authors)
        .lines()
        .map(|l| l.split('\t').next().unwrap().parse().unwrap())
        .collect();

    assert_eq!(listed, referenced);
}

#[test]
fn edge_count_per_record_is_n_choose_two() {
    let text = "Author: A\nAuthor: B\nAuthor: C\nAuthor: D\nTitle: T\nYear: 1999\nBooktitle: KDD\n\
                Author: E\nAuthor: A\nAuthor: E\nTitle: U\nYear: 2000\nBooktitle: KDD\n";
    let input = create_plain(text);
    let out = TempDir::new().unwrap();
    let paths = outputs_in(out.path());

    run_extraction(config(input.path(), out.path(), VenueFilter::accept_all())).unwrap();

    let graph = read(&paths.graph);
    assert_eq!(graph.lines().filter(|l| l.ends_with("\t1999")).count(), 6);
    assert_eq!(graph.lines().filter(|l| l.ends_with("\t2000")).count(), 3);
    // the repeated name pairs with itself
    assert!(graph.contains("4\t4\t2000\n"));
}

#[test]
fn trailing_record_without_following_author_is_processed() {
    let text = "Author: A\nTitle: First\nYear: 2000\nBooktitle: VLDB\n\
                Author: B\nAuthor: C\nTitle: Last\nYear: 2001\nBooktitle: VLDB\n";
    let input = create_plain(text);
    let out = TempDir::new().unwrap();
    let paths = outputs_in(out.path());

    run_extraction(config(input.path(), out.path(), db_venues())).unwrap();

    assert_eq!(read(&paths.graph), "1\t2\t2001\n");
    assert_eq!(read(&paths.authors), "0\tA\n1\tB\n2\tC\n");
}

#[test]
fn author_before_venue_merges_records() {
    let text = "Author: A\nTitle: One\nYear: 2000\n\
                Author: B\nTitle: Two\nYear: 2001\nBooktitle: VLDB\n";
    let input = create_plain(text);
    let out = TempDir::new().unwrap();
    let paths = outputs_in(out.path());

    let stats = run_extraction(config(input.path(), out.path(), db_venues())).unwrap();

    assert_eq!(stats.records(), 1);
    assert_eq!(read(&paths.graph), "0\t1\t2001\n");
}

// ---------------------------------------------------------------------------
// Run options
// ---------------------------------------------------------------------------

#[test]
fn dry_run_writes_no_files() {
    let input = create_plain(sample_dump());
    let out = TempDir::new().unwrap();
    let paths = outputs_in(out.path());

    let mut cfg = config(input.path(), out.path(), db_venues());
    cfg.dry_run = true;
    let stats = run_extraction(cfg).unwrap();

    assert_eq!(stats.accepted(), 2);
    assert_eq!(stats.edges(), 4);
    assert!(!paths.graph.exists());
    assert!(!paths.authors.exists());
    assert!(!paths.author_venues.exists());
}

#[test]
fn limit_caps_processed_records() {
    let input = create_plain(sample_dump());
    let out = TempDir::new().unwrap();
    let paths = outputs_in(out.path());

    let mut cfg = config(input.path(), out.path(), db_venues());
    cfg.limit = Some(1);
    let stats = run_extraction(cfg).unwrap();

    assert_eq!(stats.records(), 1);
    assert_eq!(read(&paths.graph), "0\t1\t2000\n");
    assert_eq!(read(&paths.authors), "0\tAlice\n1\tBob\n");
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn missing_input_fails_before_outputs_are_created() {
    let out = TempDir::new().unwrap();
    let paths = outputs_in(out.path());

    let result = run_extraction(config(
        &out.path().join("missing.txt"),
        out.path(),
        db_venues(),
    ));

    assert!(result.is_err());
    assert!(!paths.graph.exists());
}

#[test]
fn unwritable_output_fails() {
    let input = create_plain(SINGLE_RECORD);
    let out = TempDir::new().unwrap();

    let mut cfg = config(input.path(), out.path(), db_venues());
    cfg.outputs.authors = out.path().join("no_such_dir").join("authors");
    let err = run_extraction(cfg).unwrap_err();

    assert!(format!("{:#}", err).contains("Failed to create output file"));
}

#[test]
fn malformed_year_aborts_the_run() {
    let text = "Author: A\nTitle: T\nYear: 2000\nBooktitle: VLDB\n\
                Author: B\nTitle: U\nYear: MMI\nBooktitle: VLDB\n";
    let input = create_plain(text);
    let out = TempDir::new().unwrap();

    let err = run_extraction(config(input.path(), out.path(), db_venues())).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Invalid year"));
    assert!(message.contains("line 7"));
}
