//! Request Sources.
//!
//! A request source hands the controller one request at a time, in arrival order.
//! This module provides:
//! 1. **`RequestSource`:** The trait the simulator pulls requests through.
//! 2. **`TraceFileSource`:** A parser for whitespace-separated request traces.
//! 3. **`VecSource`:** A fixed list of requests, for tests and embedding.
//!
//! # Trace format
//!
//! One request per line, either `<time> <core> <op> <address>` or
//! `<time> <op> <address>`. `time` is a decimal cycle number, `address` is
//! hexadecimal with or without a `0x` prefix, and `op` is `0` (data read),
//! `1` (data write) or `2` (instruction fetch, scheduled as a read); `R`/`W`
//! and `READ`/`WRITE` are accepted too. Blank lines and lines starting with
//! `#` are skipped.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::data::Opcode;
use crate::common::error::TraceError;
use crate::controller::queue::MemoryRequest;

/// Supplier of memory requests in arrival order.
pub trait RequestSource {
    /// Returns the next request, or `None` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns a [`TraceError`] if the underlying input is unreadable or malformed.
    fn next_request(&mut self) -> Result<Option<MemoryRequest>, TraceError>;
}

/// Requests parsed line by line from a text trace.
#[derive(Debug)]
pub struct TraceFileSource<R: BufRead = BufReader<File>> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl TraceFileSource {
    /// Opens the trace at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Open`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TraceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> TraceFileSource<R> {
    /// Parses requests from an arbitrary buffered reader.
    pub const fn from_reader(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> RequestSource for TraceFileSource<R> {
    fn next_request(&mut self) -> Result<Option<MemoryRequest>, TraceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let line = self.buf.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            return parse_line(line)
                .map(Some)
                .map_err(|reason| TraceError::Parse {
                    line: self.line_no,
                    reason,
                });
        }
    }
}

/// Parses one non-empty trace line.
///
/// # Errors
///
/// Returns a human-readable reason when the line is malformed.
pub fn parse_line(line: &str) -> Result<MemoryRequest, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let (time, op, addr) = match fields.as_slice() {
        [time, _, op, addr] | [time, op, addr] => (*time, *op, *addr),
        _ => {
            return Err(format!(
                "expected 3 or 4 fields, found {}",
                fields.len()
            ));
        }
    };

    let issue_time = time
        .parse::<u64>()
        .map_err(|e| format!("bad time '{time}': {e}"))?;
    let opcode = parse_opcode(op)?;
    let digits = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);
    let address =
        u64::from_str_radix(digits, 16).map_err(|e| format!("bad address '{addr}': {e}"))?;

    Ok(MemoryRequest::new(opcode, address, issue_time))
}

fn parse_opcode(op: &str) -> Result<Opcode, String> {
    match op.to_ascii_uppercase().as_str() {
        "0" | "2" | "R" | "READ" | "IFETCH" => Ok(Opcode::Read),
        "1" | "W" | "WRITE" => Ok(Opcode::Write),
        _ => Err(format!("unknown operation '{op}'")),
    }
}

/// Requests served from memory.
#[derive(Clone, Debug, Default)]
pub struct VecSource {
    requests: VecDeque<MemoryRequest>,
}

impl VecSource {
    /// Creates a source that yields `requests` in order.
    pub fn new(requests: impl IntoIterator<Item = MemoryRequest>) -> Self {
        Self {
            requests: requests.into_iter().collect(),
        }
    }

    /// Requests not yet handed out.
    pub fn remaining(&self) -> usize {
        self.requests.len()
    }
}

impl RequestSource for VecSource {
    fn next_request(&mut self) -> Result<Option<MemoryRequest>, TraceError> {
        Ok(self.requests.pop_front())
    }
}
