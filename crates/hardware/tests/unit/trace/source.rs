//! # Request Source Tests
//!
//! Line parsing for both trace layouts, comment handling, error reporting with
//! line numbers, and the in-memory source.

use std::io::{Cursor, Write};

use dramsched_core::common::{Opcode, TraceError};
use dramsched_core::controller::queue::MemoryRequest;
use dramsched_core::trace::source::parse_line;
use dramsched_core::trace::{RequestSource, TraceFileSource, VecSource};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

fn drain<S: RequestSource>(source: &mut S) -> Vec<MemoryRequest> {
    let mut out = Vec::new();
    while let Some(r) = source.next_request().unwrap() {
        out.push(r);
    }
    out
}

#[rstest]
#[case("12 0 0 0x1F40", Opcode::Read, 0x1F40, 12)]
#[case("12 3 1 1F40", Opcode::Write, 0x1F40, 12)]
#[case("7 2 ABCDEF", Opcode::Read, 0xAB_CDEF, 7)]
#[case("0 W 0X10", Opcode::Write, 0x10, 0)]
#[case("5 read 40", Opcode::Read, 0x40, 5)]
#[case("5 1 WRITE 40", Opcode::Write, 0x40, 5)]
#[case("  9\t0\t0\tff  ", Opcode::Read, 0xFF, 9)]
fn parse_accepted_lines(
    #[case] line: &str,
    #[case] opcode: Opcode,
    #[case] address: u64,
    #[case] time: u64,
) {
    assert_eq!(parse_line(line.trim()), Ok(MemoryRequest::new(opcode, address, time)));
}

#[rstest]
#[case("12 0x10", "expected 3 or 4 fields")]
#[case("1 2 3 4 5", "expected 3 or 4 fields")]
#[case("x 0 0x10", "bad time")]
#[case("1 0 7 0x10", "unknown operation")]
#[case("1 0 0 0xZZ", "bad address")]
fn parse_rejected_lines(#[case] line: &str, #[case] needle: &str) {
    let reason = parse_line(line).unwrap_err();
    assert!(reason.contains(needle), "{reason}");
}

#[test]
fn file_source_skips_blank_and_comment_lines() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# time core op addr").unwrap();
    writeln!(file, "0 0 0 0x100").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "4 1 1 0x200").unwrap();
    writeln!(file, "   # indented comment").unwrap();
    writeln!(file, "9 2 0x300").unwrap();
    file.flush().unwrap();

    let mut source = TraceFileSource::open(file.path()).unwrap();
    assert_eq!(
        drain(&mut source),
        vec![
            MemoryRequest::new(Opcode::Read, 0x100, 0),
            MemoryRequest::new(Opcode::Write, 0x200, 4),
            MemoryRequest::new(Opcode::Read, 0x300, 9),
        ]
    );
    assert!(source.next_request().unwrap().is_none());
}

#[test]
fn parse_error_reports_line_number() {
    let text = "0 0 0 0x100\n# note\n3 0 9 0x100\n";
    let mut source = TraceFileSource::from_reader(Cursor::new(text));
    assert!(source.next_request().unwrap().is_some());
    match source.next_request() {
        Err(TraceError::Parse { line, reason }) => {
            assert_eq!(line, 3);
            assert!(reason.contains("unknown operation"), "{reason}");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn missing_trace_is_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TraceFileSource::open(dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, TraceError::Open { .. }), "{err:?}");
}

#[test]
fn vec_source_yields_in_order() {
    let reqs = vec![
        MemoryRequest::new(Opcode::Read, 0x40, 0),
        MemoryRequest::new(Opcode::Write, 0x80, 2),
    ];
    let mut source = VecSource::new(reqs.clone());
    assert_eq!(source.remaining(), 2);
    assert_eq!(drain(&mut source), reqs);
    assert_eq!(source.remaining(), 0);
}
