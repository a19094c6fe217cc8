//! Bank Timing Model.
//!
//! Every (bank group, bank) pair owns an independent state machine that turns one
//! latched request into a legal command sequence. This module provides:
//! 1. **Stages:** `BankStage` enumerates the states of a sequence.
//! 2. **Transition Table:** `BankStage::transition` maps a stage to the command it
//!    issues, its successor and the successor's countdown.
//! 3. **Grid:** `BankGrid` stores the cells in a flat arena and runs admission and
//!    per-cycle advancement.
//!
//! A row-buffer miss walks `PRECHARGE_WAIT -> PRECHARGE_ACTIVATE -> ACTIVATE -> ISSUE -> IDLE`;
//! a hit walks `COLUMN_WAIT -> ISSUE -> IDLE`. After RD/WR the cell is IDLE but keeps
//! counting down the CAS latency plus burst; only a fully drained cell accepts work.
//! During a refresh window the grid is held with [`BankGrid::hold`]: countdowns
//! run, transitions wait.

use tracing::debug;

use crate::common::addr::DramAddress;
use crate::common::data::{DramCommand, Opcode};
use crate::config::TimingConfig;
use crate::controller::queue::RequestId;

/// Stage of a bank's command sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BankStage {
    /// No sequence in flight.
    #[default]
    Idle,
    /// Issue RD when the countdown expires.
    ReadIssue,
    /// Issue WR when the countdown expires.
    WriteIssue,
    /// Issue ACT, then the column command.
    Activate,
    /// Issue PRE, then ACT, then the column command.
    PrechargeActivate,
    /// Row miss; previous command was in the same bank group.
    PrechargeWaitSameGroup,
    /// Row miss; previous command was in a different bank group.
    PrechargeWaitCrossGroup,
    /// Row hit; previous command was in the same bank group.
    ColumnWaitSameGroup,
    /// Row hit; previous command was in a different bank group.
    ColumnWaitCrossGroup,
}

/// Command kind produced by a stage transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueKind {
    /// PRE.
    Precharge,
    /// ACT.
    Activate,
    /// RD.
    Read,
    /// WR.
    Write,
}

/// One row of the transition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Command issued by the transition, if any.
    pub issues: Option<IssueKind>,
    /// Stage entered.
    pub next: BankStage,
    /// Countdown loaded on entry to `next`.
    pub countdown: u64,
}

impl BankStage {
    /// Looks up the transition taken when this stage's countdown expires.
    ///
    /// `opcode` selects between the read and write issue stages; it does not
    /// affect any other row. `Idle` has no transition and maps to itself.
    ///
    /// | stage | issues | next | countdown |
    /// |---|---|---|---|
    /// | `ReadIssue` | RD | `Idle` | `t_cl + t_burst` |
    /// | `WriteIssue` | WR | `Idle` | `t_cl + t_burst` |
    /// | `Activate` | ACT | issue | `t_rcd` |
    /// | `PrechargeActivate` | PRE | `Activate` | `t_rp` |
    /// | `PrechargeWaitSameGroup` | - | `PrechargeActivate` | `t_rrd_l` |
    /// | `PrechargeWaitCrossGroup` | - | `PrechargeActivate` | `t_rrd_s` |
    /// | `ColumnWaitSameGroup` | - | issue | `t_ccd_l` |
    /// | `ColumnWaitCrossGroup` | - | issue | `t_ccd_s` |
    pub const fn transition(self, opcode: Opcode, timing: &TimingConfig) -> Transition {
        let issue = match opcode {
            Opcode::Read => Self::ReadIssue,
            Opcode::Write => Self::WriteIssue,
        };
        let (issues, next, countdown) = match self {
            Self::Idle => (None, Self::Idle, 0),
            Self::ReadIssue => (Some(IssueKind::Read), Self::Idle, timing.data_drain()),
            Self::WriteIssue => (Some(IssueKind::Write), Self::Idle, timing.data_drain()),
            Self::Activate => (Some(IssueKind::Activate), issue, timing.t_rcd),
            Self::PrechargeActivate => (Some(IssueKind::Precharge), Self::Activate, timing.t_rp),
            Self::PrechargeWaitSameGroup => (None, Self::PrechargeActivate, timing.t_rrd_l),
            Self::PrechargeWaitCrossGroup => (None, Self::PrechargeActivate, timing.t_rrd_s),
            Self::ColumnWaitSameGroup => (None, issue, timing.t_ccd_l),
            Self::ColumnWaitCrossGroup => (None, issue, timing.t_ccd_s),
        };
        Transition {
            issues,
            next,
            countdown,
        }
    }

    /// True for the stages that issue RD or WR.
    #[inline]
    pub const fn is_issue(self) -> bool {
        matches!(self, Self::ReadIssue | Self::WriteIssue)
    }
}

/// The most recently issued command, used to choose same- or cross-group delays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviousCommand {
    /// Bank group of the command.
    pub bank_group: usize,
    /// Bank of the command.
    pub bank: usize,
    /// Direction of the request the command served.
    pub direction: Opcode,
}

/// The request a bank is working on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingAccess {
    /// Queue id of the request.
    pub id: RequestId,
    /// Request direction.
    pub opcode: Opcode,
    /// Raw physical address.
    pub address: u64,
    /// Decoded coordinates.
    pub decoded: DramAddress,
}

/// State of one bank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BankCell {
    /// Current stage.
    pub stage: BankStage,
    /// Cycles left before the stage's transition (or before the drain ends when idle).
    pub countdown: u64,
    /// Row latched in the row buffer, if any.
    pub open_row: Option<u64>,
    /// Request latched by the last admission; cleared once RD/WR is issued.
    pub pending: Option<PendingAccess>,
}

impl BankCell {
    /// True when the bank can accept a new sequence.
    #[inline]
    pub const fn is_available(&self) -> bool {
        matches!(self.stage, BankStage::Idle) && self.countdown == 0
    }
}

/// Outcome of latching a request into a bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowBuffer {
    /// The requested row was already open.
    Hit,
    /// A different row (or none) was open.
    Miss,
}

/// A command issued during bank advancement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Issued {
    /// Request served by the command.
    pub id: RequestId,
    /// The physical command.
    pub command: DramCommand,
    /// Direction of the request.
    pub direction: Opcode,
}

/// Flat arena of bank cells indexed by (bank group, bank).
#[derive(Debug)]
pub struct BankGrid {
    cells: Vec<BankCell>,
    bank_groups: usize,
    banks_per_group: usize,
}

impl BankGrid {
    /// Creates a grid of idle banks with no open rows.
    pub fn new(bank_groups: usize, banks_per_group: usize) -> Self {
        Self {
            cells: vec![BankCell::default(); bank_groups * banks_per_group],
            bank_groups,
            banks_per_group,
        }
    }

    /// Number of bank groups.
    pub const fn bank_groups(&self) -> usize {
        self.bank_groups
    }

    /// Number of banks in each group.
    pub const fn banks_per_group(&self) -> usize {
        self.banks_per_group
    }

    #[inline]
    const fn index(&self, bank_group: usize, bank: usize) -> usize {
        bank_group * self.banks_per_group + bank
    }

    /// Returns the cell at (`bank_group`, `bank`).
    pub fn cell(&self, bank_group: usize, bank: usize) -> &BankCell {
        &self.cells[self.index(bank_group, bank)]
    }

    /// Iterates all cells with their coordinates, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &BankCell)> + '_ {
        let per = self.banks_per_group;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| ((i / per, i % per), c))
    }

    /// True when the bank addressed by `addr` can accept a new sequence.
    pub fn is_available(&self, addr: &DramAddress) -> bool {
        self.cell(addr.bank_group, addr.bank).is_available()
    }

    /// True when every bank is idle and drained.
    pub fn is_quiescent(&self) -> bool {
        self.cells.iter().all(BankCell::is_available)
    }

    /// Latches `access` into its bank and chooses the first stage.
    ///
    /// A row hit enters a column-to-column wait, a miss a precharge wait. The
    /// same-group variant is used when `previous` targeted the same bank group;
    /// no previous command selects the cross-group variant.
    ///
    /// # Panics
    ///
    /// Panics if the target bank is not idle and drained. Candidate selection
    /// only offers requests whose bank is available.
    pub fn bank_status_checks(
        &mut self,
        access: PendingAccess,
        previous: Option<PreviousCommand>,
    ) -> RowBuffer {
        let addr = access.decoded;
        let idx = self.index(addr.bank_group, addr.bank);
        let cell = &mut self.cells[idx];
        assert!(
            cell.is_available(),
            "request {} latched into busy bank {}/{} ({:?}, countdown {})",
            access.id,
            addr.bank_group,
            addr.bank,
            cell.stage,
            cell.countdown
        );

        let same_group = previous.is_some_and(|p| p.bank_group == addr.bank_group);
        let hit = cell.open_row == Some(addr.row);
        cell.stage = match (hit, same_group) {
            (true, true) => BankStage::ColumnWaitSameGroup,
            (true, false) => BankStage::ColumnWaitCrossGroup,
            (false, true) => BankStage::PrechargeWaitSameGroup,
            (false, false) => BankStage::PrechargeWaitCrossGroup,
        };
        cell.countdown = 0;
        cell.pending = Some(access);

        if hit { RowBuffer::Hit } else { RowBuffer::Miss }
    }

    /// Advances every bank by one cycle.
    ///
    /// Non-zero countdowns are decremented; every non-idle cell whose countdown is
    /// zero then takes its transition. A cell due to issue RD/WR only does so while
    /// `output_free` is set, and claims the slot when it does; otherwise it holds
    /// at countdown zero. Issued commands are appended to `issued` in arena order.
    ///
    /// # Panics
    ///
    /// Panics if a non-idle cell has no latched request.
    pub fn advance(
        &mut self,
        timing: &TimingConfig,
        mut output_free: bool,
        issued: &mut Vec<Issued>,
    ) {
        for cell in &mut self.cells {
            if cell.countdown > 0 {
                cell.countdown -= 1;
            }
            if cell.countdown > 0 || cell.stage == BankStage::Idle {
                continue;
            }
            if cell.stage.is_issue() && !output_free {
                continue;
            }
            let Some(access) = cell.pending else {
                unreachable!(
                    "bank in {:?} at countdown 0 has no latched request",
                    cell.stage
                );
            };

            let t = cell.stage.transition(access.opcode, timing);
            let addr = access.decoded;
            cell.stage = t.next;
            cell.countdown = t.countdown;

            let Some(kind) = t.issues else { continue };
            let command = match kind {
                IssueKind::Precharge => {
                    cell.open_row = None;
                    DramCommand::Precharge {
                        bank_group: addr.bank_group,
                        bank: addr.bank,
                    }
                }
                IssueKind::Activate => {
                    cell.open_row = Some(addr.row);
                    DramCommand::Activate {
                        bank_group: addr.bank_group,
                        bank: addr.bank,
                        row: addr.row,
                    }
                }
                IssueKind::Read | IssueKind::Write => {
                    output_free = false;
                    cell.pending = None;
                    if kind == IssueKind::Read {
                        DramCommand::Read {
                            bank_group: addr.bank_group,
                            bank: addr.bank,
                            column: addr.column,
                        }
                    } else {
                        DramCommand::Write {
                            bank_group: addr.bank_group,
                            bank: addr.bank,
                            column: addr.column,
                        }
                    }
                }
            };
            debug!(
                bank_group = addr.bank_group,
                bank = addr.bank,
                request = access.id,
                next = ?cell.stage,
                "bank issued {}",
                command.mnemonic()
            );
            issued.push(Issued {
                id: access.id,
                command,
                direction: access.opcode,
            });
        }
    }

    /// Advances every bank by one cycle without taking any transition.
    ///
    /// Countdowns still expire, so a cell that reaches zero while held transitions
    /// on the first cycle it is advanced again.
    pub fn hold(&mut self) {
        for cell in &mut self.cells {
            cell.countdown = cell.countdown.saturating_sub(1);
        }
    }

    /// Fast-forwards `cycles` idle cycles.
    ///
    /// Only drain countdowns of idle cells are consumed; the caller guarantees no
    /// sequence is in flight.
    pub fn skip(&mut self, cycles: u64) {
        for cell in &mut self.cells {
            debug_assert_eq!(cell.stage, BankStage::Idle);
            cell.countdown = cell.countdown.saturating_sub(cycles);
        }
    }
}
