//! Trace I/O.
//!
//! The controller's two external collaborators:
//! 1. **Sinks:** Where issued commands are recorded.
//! 2. **Sources:** Where memory requests come from.

/// Command trace sinks.
pub mod sink;

/// Memory request sources.
pub mod source;

pub use sink::{CommandSink, FileTraceSink, MemorySink, TraceRecord};
pub use source::{RequestSource, TraceFileSource, VecSource};
