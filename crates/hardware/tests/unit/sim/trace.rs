//! Trace Reader Tests.
//!
//! Line parsing (kinds, address forms, comments) and the streaming reader's
//! line numbering and error recovery.

use std::io::{Cursor, Write};

use cachesim_core::common::AccessType;
use cachesim_core::sim::trace::parse_line;
use cachesim_core::sim::{TraceError, TraceReader, TraceRecord};
use rstest::rstest;
use tempfile::NamedTempFile;

const fn fetch(addr: u32) -> TraceRecord {
    TraceRecord {
        access: AccessType::Fetch,
        addr,
    }
}

const fn data(addr: u32) -> TraceRecord {
    TraceRecord {
        access: AccessType::Data,
        addr,
    }
}

// ══════════════════════════════════════════════════════════
// 1. Single lines
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("I 0x1f", fetch(0x1f))]
#[case("i 1F", fetch(0x1f))]
#[case("D 0X00400000", data(0x0040_0000))]
#[case("d ffffffff", data(0xFFFF_FFFF))]
#[case("  I\t0x10   trailing fields ignored ", fetch(0x10))]
fn parses_records(#[case] line: &str, #[case] expected: TraceRecord) {
    assert_eq!(parse_line(line, 1).expect("valid line"), Some(expected));
}

#[rstest]
#[case("")]
#[case("   \t")]
#[case("# comment")]
#[case("  #I 0x10")]
fn skips_blank_and_comment_lines(#[case] line: &str) {
    assert_eq!(parse_line(line, 1).expect("skippable line"), None);
}

#[test]
fn unknown_kind_is_reported_with_line() {
    match parse_line("X 0x10", 7) {
        Err(TraceError::UnknownKind { line, kind }) => {
            assert_eq!(line, 7);
            assert_eq!(kind, "X");
        }
        other => panic!("expected UnknownKind, got {other:?}"),
    }
}

#[rstest]
#[case("I", "")]
#[case("D 0x", "0x")]
#[case("I zz", "zz")]
#[case("D 0x1_0000_0000", "0x1_0000_0000")]
#[case("I 100000000", "100000000")]
fn bad_addresses_are_reported(#[case] line: &str, #[case] expected: &str) {
    match parse_line(line, 3) {
        Err(TraceError::InvalidAddress { line, text }) => {
            assert_eq!(line, 3);
            assert_eq!(text, expected);
        }
        other => panic!("expected InvalidAddress, got {other:?}"),
    }
}

#[test]
fn error_messages_name_the_line() {
    let e = parse_line("Q 0", 12).expect_err("unknown kind");
    assert_eq!(e.to_string(), "line 12: unknown access kind \"Q\", expected I or D");
    let e = parse_line("I g", 4).expect_err("bad address");
    assert_eq!(e.to_string(), "line 4: invalid address \"g\"");
}

// ══════════════════════════════════════════════════════════
// 2. Streaming reader
// ══════════════════════════════════════════════════════════

#[test]
fn reader_yields_records_in_order() {
    let text = "# kind addr\nI 0x00\n\nD 0x10\ni 20\n";
    let records: Vec<TraceRecord> = TraceReader::new(Cursor::new(text))
        .collect::<Result<_, _>>()
        .expect("well-formed trace");
    assert_eq!(records, vec![fetch(0x00), data(0x10), fetch(0x20)]);
}

#[test]
fn reader_counts_skipped_lines_and_continues_after_errors() {
    let text = "I 0\n# skip\n\nZ 4\nD 8\n";
    let items: Vec<_> = TraceReader::new(Cursor::new(text)).collect();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_ref().ok(), Some(&fetch(0)));
    assert!(matches!(
        items[1],
        Err(TraceError::UnknownKind { line: 4, .. })
    ));
    assert_eq!(items[2].as_ref().ok(), Some(&data(8)));
}

#[test]
fn reader_handles_missing_trailing_newline() {
    let records: Vec<_> = TraceReader::new(Cursor::new("D 0x40"))
        .collect::<Result<Vec<_>, _>>()
        .expect("well-formed trace");
    assert_eq!(records, vec![data(0x40)]);
}

#[test]
fn empty_trace_yields_nothing() {
    assert_eq!(TraceReader::new(Cursor::new("")).count(), 0);
}

#[test]
fn reads_trace_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"I 0x00\nI 0x10\nD 0x1000\n").unwrap();
    file.flush().unwrap();

    let reader = std::io::BufReader::new(file.reopen().unwrap());
    let records: Vec<TraceRecord> = TraceReader::new(reader)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records, vec![fetch(0x00), fetch(0x10), data(0x1000)]);
}
