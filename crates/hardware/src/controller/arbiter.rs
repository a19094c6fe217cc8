//! Output Arbiter.
//!
//! Decides, once per command-bus cycle, whether the completed RD/WR waiting in the
//! output buffer may go out. Refresh suppression always wins over a ready command.

use crate::common::constants::OUTPUT_CLOCK_DIVIDER;
use crate::common::data::DramCommand;
use crate::controller::queue::RequestId;

/// A completed column command and the request it terminates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletedCommand {
    /// Request retired when the command is emitted.
    pub id: RequestId,
    /// The RD or WR command.
    pub command: DramCommand,
    /// Cycle at which the bank issued the command.
    pub issued_at: u64,
}

/// Single-entry buffer between the bank grid and the command bus.
#[derive(Clone, Debug, Default)]
pub struct OutputBuffer {
    slot: Option<CompletedCommand>,
}

impl OutputBuffer {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// The "normal output ready" signal.
    #[inline]
    pub const fn is_ready(&self) -> bool {
        self.slot.is_some()
    }

    /// True when a bank may deposit a command.
    #[inline]
    pub const fn is_free(&self) -> bool {
        self.slot.is_none()
    }

    /// Returns the buffered command without removing it.
    pub const fn peek(&self) -> Option<&CompletedCommand> {
        self.slot.as_ref()
    }

    /// Deposits a completed command.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is occupied; banks only issue RD/WR into a free buffer.
    pub fn load(&mut self, completed: CompletedCommand) {
        assert!(
            self.slot.is_none(),
            "output buffer overwritten by request {}",
            completed.id
        );
        self.slot = Some(completed);
    }

    /// Removes and returns the buffered command, clearing the ready signal.
    pub const fn take(&mut self) -> Option<CompletedCommand> {
        self.slot.take()
    }
}

/// Output gating decision for one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grant {
    /// Not a command-bus cycle.
    OffTick,
    /// A refresh window holds the bus.
    Suppressed,
    /// Nothing is waiting.
    Empty,
    /// The buffered command may be emitted.
    Emit,
}

/// Stateless output arbiter.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutputArbiter;

impl OutputArbiter {
    /// True on controller cycles that coincide with a command-bus edge.
    #[inline]
    pub const fn is_output_tick(cycle: u64) -> bool {
        cycle % OUTPUT_CLOCK_DIVIDER == 0
    }

    /// Output enable: refresh suppression first, then readiness.
    #[inline]
    pub const fn permits(suppressing: bool, ready: bool) -> bool {
        !suppressing && ready
    }

    /// Full gating decision for `cycle`.
    pub const fn grant(cycle: u64, suppressing: bool, ready: bool) -> Grant {
        if !Self::is_output_tick(cycle) {
            Grant::OffTick
        } else if Self::permits(suppressing, ready) {
            Grant::Emit
        } else if suppressing {
            Grant::Suppressed
        } else {
            Grant::Empty
        }
    }
}
