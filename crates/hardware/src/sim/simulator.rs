//! Simulator: owns the controller next to its request source and command sink.
//!
//! The controller itself only sees one offered request per cycle. The simulator
//! plays the source side of the handshake: it holds the request the source produced
//! and keeps offering it every cycle until the controller reports it admitted.

use tracing::info;

use crate::common::error::SimError;
use crate::config::Config;
use crate::controller::queue::MemoryRequest;
use crate::controller::{MemoryController, TickOutcome};
use crate::stats::ControllerStats;
use crate::trace::sink::CommandSink;
use crate::trace::source::RequestSource;

/// Top-level simulation driver.
#[derive(Debug)]
pub struct Simulator<S, K> {
    /// The scheduling model.
    pub controller: MemoryController,
    source: S,
    sink: K,
    held: Option<MemoryRequest>,
    exhausted: bool,
    last: TickOutcome,
}

impl<S: RequestSource, K: CommandSink> Simulator<S, K> {
    /// Creates a simulator with a fresh controller built from `config`.
    pub fn new(config: &Config, source: S, sink: K) -> Self {
        Self {
            controller: MemoryController::new(config),
            source,
            sink,
            held: None,
            exhausted: false,
            last: TickOutcome::default(),
        }
    }

    /// Advances one controller cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`SimError`] if the source or sink fails.
    pub fn tick(&mut self) -> Result<TickOutcome, SimError> {
        if self.held.is_none() && !self.exhausted {
            self.held = self.source.next_request()?;
            self.exhausted = self.held.is_none();
        }

        let outcome = self.controller.tick(self.held.as_ref(), &mut self.sink)?;
        if outcome.admitted.is_some() {
            self.held = None;
        }
        self.last = outcome;
        Ok(outcome)
    }

    /// True once every request has been read, admitted and retired.
    pub const fn is_finished(&self) -> bool {
        self.exhausted && self.held.is_none() && self.controller.is_drained()
    }

    /// Handshake flags from the most recent cycle.
    pub const fn last_outcome(&self) -> TickOutcome {
        self.last
    }

    /// Runs until every request is retired, then flushes the sink.
    ///
    /// # Arguments
    ///
    /// * `max_cycles` - Optional limit on controller time (simulated plus skipped).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::CycleLimit`] if the limit is reached first, or any
    /// source or sink error.
    pub fn run(&mut self, max_cycles: Option<u64>) -> Result<&ControllerStats, SimError> {
        info!("simulation started");
        while !self.is_finished() {
            if let Some(limit) = max_cycles.filter(|&l| self.controller.now() >= l) {
                self.sink.flush()?;
                return Err(SimError::CycleLimit {
                    limit,
                    outstanding: self.controller.queue().len() + usize::from(self.held.is_some()),
                });
            }
            let _ = self.tick()?;
        }
        self.sink.flush()?;

        let stats = self.controller.stats();
        info!(
            cycles = self.controller.now(),
            retired = stats.requests_retired,
            "simulation finished"
        );
        Ok(stats)
    }

    /// The command sink.
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    /// Consumes the simulator, returning the sink.
    pub fn into_sink(self) -> K {
        self.sink
    }
}
