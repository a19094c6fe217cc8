//! Error definitions.
//!
//! The controller model itself has no runtime failure mode: overflow is expressed as
//! backpressure and every address decodes. Errors therefore come from the edges:
//! 1. **Configuration:** Unreadable, unparsable or inconsistent configuration.
//! 2. **Trace I/O:** Opening, reading, parsing or writing request and command traces.
//! 3. **Simulation:** The umbrella type returned by the controller and simulator loops.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid JSON for the expected schema.
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but describes an impossible controller.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Request-trace and command-trace errors.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A trace file could not be opened or created.
    #[error("cannot open trace {path}: {source}")]
    Open {
        /// Path of the trace file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading or writing an already open trace failed.
    #[error("trace I/O error: {0}")]
    Io(#[from] io::Error),

    /// A request-trace line could not be parsed.
    #[error("line {line}: {reason}")]
    Parse {
        /// One-based line number in the request trace.
        line: usize,
        /// Description of the problem.
        reason: String,
    },
}

/// Top-level simulation error.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Trace error.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// The simulation exceeded its cycle limit before draining.
    #[error("cycle limit of {limit} reached with {outstanding} request(s) outstanding")]
    CycleLimit {
        /// Configured cycle limit.
        limit: u64,
        /// Requests still queued or unsubmitted.
        outstanding: usize,
    },
}
