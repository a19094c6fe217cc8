//! Command Trace Sinks.
//!
//! Every command the controller puts on the bus is recorded as one line,
//! `<cycle> <command fields>`. This module provides:
//! 1. **`CommandSink`:** The trait the controller writes through.
//! 2. **`FileTraceSink`:** Buffered text file output.
//! 3. **`MemorySink`:** In-memory records for tests and embedding.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::common::data::DramCommand;
use crate::common::error::TraceError;

/// Destination for issued DRAM commands.
pub trait CommandSink {
    /// Records `command` as issued at controller cycle `cycle`.
    ///
    /// # Errors
    ///
    /// Returns a [`TraceError`] if the record cannot be stored.
    fn record(&mut self, cycle: u64, command: &DramCommand) -> Result<(), TraceError>;

    /// Flushes any buffered records.
    ///
    /// # Errors
    ///
    /// Returns a [`TraceError`] if buffered records cannot be written.
    fn flush(&mut self) -> Result<(), TraceError> {
        Ok(())
    }
}

/// Text trace written to any `Write` implementation.
#[derive(Debug)]
pub struct FileTraceSink<W: Write = BufWriter<File>> {
    out: W,
    lines: u64,
}

impl FileTraceSink {
    /// Creates (or truncates) the trace file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Open`] if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| TraceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> FileTraceSink<W> {
    /// Wraps an arbitrary writer.
    pub const fn from_writer(out: W) -> Self {
        Self { out, lines: 0 }
    }

    /// Number of records written so far.
    pub const fn lines(&self) -> u64 {
        self.lines
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CommandSink for FileTraceSink<W> {
    fn record(&mut self, cycle: u64, command: &DramCommand) -> Result<(), TraceError> {
        writeln!(self.out, "{cycle} {command}")?;
        self.lines += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TraceError> {
        self.out.flush()?;
        Ok(())
    }
}

/// A recorded command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Controller cycle of issue.
    pub cycle: u64,
    /// The command.
    pub command: DramCommand,
}

/// Collects records in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    records: Vec<TraceRecord>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// All records, in issue order.
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Renders the records exactly as a [`FileTraceSink`] would.
    pub fn lines(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| format!("{} {}", r.cycle, r.command))
            .collect()
    }
}

impl CommandSink for MemorySink {
    fn record(&mut self, cycle: u64, command: &DramCommand) -> Result<(), TraceError> {
        self.records.push(TraceRecord {
            cycle,
            command: *command,
        });
        Ok(())
    }
}
