//! Memory controller command scheduler.
//!
//! This module ties the scheduling components together:
//! 1. **Queue:** Bounded, time-ordered holding area for admitted requests.
//! 2. **Banks:** Per-bank timing state machines producing PRE/ACT/RD/WR.
//! 3. **Refresh:** Periodic refresh windows that suppress normal output.
//! 4. **Arbiter:** Half-rate output gate that emits completed RD/WR and retires requests.
//!
//! [`MemoryController::tick`] advances one controller cycle in a fixed phase order:
//! (1) arbiter emission, (2) dispatch of one candidate into a bank, (3) advancement
//! of every bank, (4) admission of the offered request and aging of the queue,
//! (5) refresh timers. Each phase is the only writer of the state it owns, so the
//! cycle is deterministic.
//!
//! A refresh window is a pause in bank access as well as in output: while the
//! refresh flag from the previous cycle is set, nothing is dispatched and the
//! banks only count down, so no PRE, ACT, RD or WR reaches the trace inside a
//! window.

/// Output buffer and arbiter.
pub mod arbiter;

/// Bank timing state machines.
pub mod bank;

/// Request queue.
pub mod queue;

/// Refresh timer.
pub mod refresh;

use tracing::{debug, trace, warn};

use self::arbiter::{CompletedCommand, Grant, OutputArbiter, OutputBuffer};
use self::bank::{BankGrid, Issued, PendingAccess, PreviousCommand, RowBuffer};
use self::queue::{AdmitOutcome, MemoryRequest, RequestId, RequestQueue};
use self::refresh::RefreshController;
use crate::common::addr::AddressMapping;
use crate::common::constants::{BACKPRESSURE_WARN_CYCLES, QOS_AGE_THRESHOLD};
use crate::common::data::DramCommand;
use crate::common::error::TraceError;
use crate::config::{Config, TimingConfig};
use crate::stats::ControllerStats;
use crate::trace::sink::CommandSink;

/// Handshake flags returned to the request source after each cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Id of the request admitted this cycle, if any.
    pub admitted: Option<RequestId>,
    /// The offered request was refused and must be resubmitted.
    pub pending_request: bool,
    /// The queue was empty but the offered request still lies in the future after
    /// an idle skip stopped at a refresh window; offer it again later.
    pub deferred: bool,
    /// The queue is at capacity.
    pub queue_full: bool,
}

/// Cycle-level DRAM command scheduler.
#[derive(Debug)]
pub struct MemoryController {
    timing: TimingConfig,
    mapping: AddressMapping,
    queue: RequestQueue,
    banks: BankGrid,
    refresh: RefreshController,
    output: OutputBuffer,
    previous: Option<PreviousCommand>,
    now: u64,
    issued: Vec<Issued>,
    rejected_streak: u64,
    stats: ControllerStats,
}

impl MemoryController {
    /// Builds a controller from a validated configuration.
    pub fn new(config: &Config) -> Self {
        let mapping = config.address_mapping();
        Self {
            timing: config.timing.clone(),
            mapping,
            queue: RequestQueue::new(config.queue.capacity),
            banks: BankGrid::new(mapping.bank_groups(), mapping.banks_per_group()),
            refresh: RefreshController::new(
                config.timing.refresh_interval,
                config.timing.refresh_window,
            ),
            output: OutputBuffer::new(),
            previous: None,
            now: 0,
            issued: Vec::new(),
            rejected_streak: 0,
            stats: ControllerStats::default(),
        }
    }

    /// Current controller cycle (the cycle the next `tick` simulates).
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// The request queue.
    pub const fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    /// The bank grid.
    pub const fn banks(&self) -> &BankGrid {
        &self.banks
    }

    /// The refresh controller.
    pub const fn refresh(&self) -> &RefreshController {
        &self.refresh
    }

    /// The output buffer.
    pub const fn output(&self) -> &OutputBuffer {
        &self.output
    }

    /// The most recently issued command's bank and direction.
    pub const fn previous_command(&self) -> Option<PreviousCommand> {
        self.previous
    }

    /// Address decoder in use.
    pub const fn mapping(&self) -> &AddressMapping {
        &self.mapping
    }

    /// Collected statistics.
    pub const fn stats(&self) -> &ControllerStats {
        &self.stats
    }

    /// True when the controller holds no requests.
    pub const fn is_drained(&self) -> bool {
        self.queue.is_empty() && self.output.is_free()
    }

    /// Simulates one controller cycle.
    ///
    /// `offered` is the request the source presents this cycle; when it is refused
    /// the returned outcome has `pending_request` set and the source must offer it
    /// again. When the queue is empty and `offered` lies in the future, idle time
    /// is skipped first, stopping early at the next refresh window; a request still
    /// early after that comes back `deferred` rather than refused.
    ///
    /// # Errors
    ///
    /// Returns a [`TraceError`] if the sink rejects a record.
    pub fn tick(
        &mut self,
        offered: Option<&MemoryRequest>,
        sink: &mut dyn CommandSink,
    ) -> Result<TickOutcome, TraceError> {
        if let Some(request) = offered {
            self.skip_idle(request.issue_time);
        }

        let suppressing = self.refresh.is_suppressing();
        self.emit_output(sink)?;
        if suppressing {
            self.banks.hold();
        } else {
            self.dispatch();
            self.advance_banks(sink)?;
        }
        let outcome = self.admit(offered);
        if self.refresh.tick() {
            sink.record(self.now, &DramCommand::Refresh)?;
            self.stats.refreshes += 1;
            debug!(cycle = self.now, "refresh window opened");
        }

        self.now += 1;
        self.stats.cycles += 1;
        Ok(outcome)
    }

    /// Jumps over idle cycles before an offered request's issue time.
    fn skip_idle(&mut self, issue_time: u64) {
        if !self.queue.is_empty() || issue_time <= self.now {
            return;
        }
        let skipped = self.refresh.skip(issue_time - self.now);
        if skipped == 0 {
            return;
        }
        self.banks.skip(skipped);
        self.now += skipped;
        self.stats.skipped_cycles += skipped;
        trace!(to = self.now, skipped, "idle time skipped");
    }

    /// Phase 1: emit the completed command if the bus and refresh allow it.
    fn emit_output(&mut self, sink: &mut dyn CommandSink) -> Result<(), TraceError> {
        match OutputArbiter::grant(
            self.now,
            self.refresh.is_suppressing(),
            self.output.is_ready(),
        ) {
            Grant::Emit => {}
            Grant::Suppressed => {
                if self.output.is_ready() {
                    self.stats.suppressed_output_ticks += 1;
                }
                return Ok(());
            }
            Grant::OffTick | Grant::Empty => return Ok(()),
        }

        let Some(completed) = self.output.take() else {
            return Ok(());
        };
        sink.record(self.now, &completed.command)?;
        self.stats.record_bus_wait(self.now - completed.issued_at);
        match completed.command {
            DramCommand::Read { .. } => self.stats.reads += 1,
            DramCommand::Write { .. } => self.stats.writes += 1,
            _ => {}
        }

        match self.queue.retire(completed.id) {
            Some(entry) => {
                self.stats.record_retirement(self.now - entry.admitted_at);
                debug!(
                    cycle = self.now,
                    request = entry.id,
                    age = entry.age,
                    "request retired"
                );
            }
            None => warn!(request = completed.id, "emitted command for unknown request"),
        }
        Ok(())
    }

    /// Phase 2: latch at most one queued request into its bank.
    fn dispatch(&mut self) {
        let Some(id) = self.select_dispatch() else {
            return;
        };
        let Some(entry) = self.queue.get(id).copied() else {
            return;
        };
        let decoded = self.mapping.decode(entry.request.address);
        let access = PendingAccess {
            id,
            opcode: entry.request.opcode,
            address: entry.request.address,
            decoded,
        };
        let row = self.banks.bank_status_checks(access, self.previous);
        let marked = self.queue.mark_dispatched(id);
        debug_assert!(marked, "dispatched request {id} is not resident");
        match row {
            RowBuffer::Hit => self.stats.row_hits += 1,
            RowBuffer::Miss => self.stats.row_misses += 1,
        }
        debug!(
            cycle = self.now,
            request = id,
            bank_group = decoded.bank_group,
            bank = decoded.bank,
            row = decoded.row,
            ?row,
            "request dispatched"
        );
    }

    /// Picks the request to dispatch this cycle.
    ///
    /// The oldest undispatched request goes first if its bank is available. If not,
    /// a younger request to an available bank may overtake it, unless the oldest has
    /// waited [`QOS_AGE_THRESHOLD`] cycles, in which case nothing is dispatched
    /// until its bank frees up.
    fn select_dispatch(&mut self) -> Option<RequestId> {
        let mut candidates = self.queue.candidates();
        let oldest = candidates.next()?;
        if self.banks.is_available(&self.mapping.decode(oldest.request.address)) {
            return Some(oldest.id);
        }
        if oldest.age >= QOS_AGE_THRESHOLD {
            self.stats.qos_holds += 1;
            return None;
        }
        candidates
            .find(|e| self.banks.is_available(&self.mapping.decode(e.request.address)))
            .map(|e| e.id)
    }

    /// Phase 3: advance every bank and route the commands they issue.
    fn advance_banks(&mut self, sink: &mut dyn CommandSink) -> Result<(), TraceError> {
        self.issued.clear();
        self.banks
            .advance(&self.timing, self.output.is_free(), &mut self.issued);

        for issued in &self.issued {
            if let Some((bank_group, bank)) = issued.command.target() {
                self.previous = Some(PreviousCommand {
                    bank_group,
                    bank,
                    direction: issued.direction,
                });
            }
            match issued.command {
                DramCommand::Read { .. } | DramCommand::Write { .. } => {
                    self.output.load(CompletedCommand {
                        id: issued.id,
                        command: issued.command,
                        issued_at: self.now,
                    });
                }
                DramCommand::Activate { .. } => {
                    sink.record(self.now, &issued.command)?;
                    self.stats.activates += 1;
                }
                DramCommand::Precharge { .. } => {
                    sink.record(self.now, &issued.command)?;
                    self.stats.precharges += 1;
                }
                DramCommand::Refresh => {}
            }
        }
        Ok(())
    }

    /// Phase 4: age resident entries, then offer the incoming request.
    fn admit(&mut self, offered: Option<&MemoryRequest>) -> TickOutcome {
        self.queue.age_all();

        let mut outcome = TickOutcome::default();
        if let Some(request) = offered {
            // After a capped idle skip an empty queue may still be early.
            if self.queue.is_empty() && request.issue_time > self.now {
                outcome.deferred = true;
                trace!(cycle = self.now, issue_time = request.issue_time, "request deferred");
                return outcome;
            }
            match self.queue.try_admit(*request, self.now) {
                AdmitOutcome::Admitted(id) => {
                    self.stats.requests_admitted += 1;
                    self.rejected_streak = 0;
                    outcome.admitted = Some(id);
                    debug!(
                        cycle = self.now,
                        request = id,
                        opcode = %request.opcode,
                        address = request.address,
                        "request admitted"
                    );
                }
                AdmitOutcome::Pending => {
                    outcome.pending_request = true;
                    self.stats.backpressure_rejections += 1;
                    self.rejected_streak += 1;
                    if self.rejected_streak == BACKPRESSURE_WARN_CYCLES {
                        warn!(
                            cycle = self.now,
                            queued = self.queue.len(),
                            "request source stalled by backpressure for {} cycles",
                            BACKPRESSURE_WARN_CYCLES
                        );
                    }
                }
            }
        }

        outcome.queue_full = self.queue.is_full();
        if outcome.queue_full {
            self.stats.queue_full_cycles += 1;
        }
        outcome
    }
}
