//! Request and Command Types.
//!
//! This module defines the two vocabularies the controller translates between:
//! 1. **Requests:** `Opcode` classifies what the request source asks for (read or write).
//! 2. **Commands:** `DramCommand` is a physical command issued on the DRAM command bus.
//!
//! The `Display` form of a command is the trace-record body written after the cycle
//! number: `RD <bg> <bank> <col>`, `WR <bg> <bank> <col>`, `ACT <bg> <bank> <row>`,
//! `PRE <bg> <bank>` and `REF`. Rows and columns are printed in hexadecimal.

use std::fmt;

/// Direction of a memory request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Data read (also used for instruction fetches).
    Read,
    /// Data write.
    Write,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "READ"),
            Self::Write => write!(f, "WRITE"),
        }
    }
}

/// A physical DRAM command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DramCommand {
    /// Opens `row` in the addressed bank.
    Activate {
        /// Bank group index.
        bank_group: usize,
        /// Bank index within the group.
        bank: usize,
        /// Row being opened.
        row: u64,
    },
    /// Closes the open row in the addressed bank.
    Precharge {
        /// Bank group index.
        bank_group: usize,
        /// Bank index within the group.
        bank: usize,
    },
    /// Column read from the open row.
    Read {
        /// Bank group index.
        bank_group: usize,
        /// Bank index within the group.
        bank: usize,
        /// Column being read.
        column: u64,
    },
    /// Column write into the open row.
    Write {
        /// Bank group index.
        bank_group: usize,
        /// Bank index within the group.
        bank: usize,
        /// Column being written.
        column: u64,
    },
    /// All-bank refresh.
    Refresh,
}

impl DramCommand {
    /// Returns the trace mnemonic of the command.
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Self::Activate { .. } => "ACT",
            Self::Precharge { .. } => "PRE",
            Self::Read { .. } => "RD",
            Self::Write { .. } => "WR",
            Self::Refresh => "REF",
        }
    }

    /// True for the data-bearing commands that terminate a request (RD and WR).
    pub const fn is_column(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Write { .. })
    }

    /// Bank coordinates addressed by the command, if any.
    pub const fn target(&self) -> Option<(usize, usize)> {
        match *self {
            Self::Activate {
                bank_group, bank, ..
            }
            | Self::Precharge { bank_group, bank }
            | Self::Read {
                bank_group, bank, ..
            }
            | Self::Write {
                bank_group, bank, ..
            } => Some((bank_group, bank)),
            Self::Refresh => None,
        }
    }
}

impl fmt::Display for DramCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Activate {
                bank_group,
                bank,
                row,
            } => write!(f, "ACT {bank_group} {bank} {row:X}"),
            Self::Precharge { bank_group, bank } => write!(f, "PRE {bank_group} {bank}"),
            Self::Read {
                bank_group,
                bank,
                column,
            } => write!(f, "RD {bank_group} {bank} {column:X}"),
            Self::Write {
                bank_group,
                bank,
                column,
            } => write!(f, "WR {bank_group} {bank} {column:X}"),
            Self::Refresh => write!(f, "REF"),
        }
    }
}
