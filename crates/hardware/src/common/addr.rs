//! DRAM address decomposition.
//!
//! This module splits a flat physical address into the coordinates the
//! controller schedules against. It provides the following:
//! 1. **Bit Fields:** `AddressField` describes one contiguous field by shift and width.
//! 2. **Mapping:** `AddressMapping` groups the bank-group, bank, row and column fields.
//! 3. **Coordinates:** `DramAddress` is the decoded result consumed by the bank grid.
//!
//! The mapping is fixed at initialization. Every address decodes, so decoding has no
//! failure mode; bits outside the configured fields are ignored.

use serde::{Deserialize, Serialize};

/// A contiguous bit field inside a physical address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AddressField {
    /// Bit position of the field's least significant bit.
    pub shift: u32,
    /// Number of bits in the field.
    pub width: u32,
}

impl AddressField {
    /// Creates a field covering `width` bits starting at bit `shift`.
    pub const fn new(shift: u32, width: u32) -> Self {
        Self { shift, width }
    }

    /// Returns the mask of the field, already shifted into position.
    #[inline]
    pub const fn mask(&self) -> u64 {
        self.low_mask() << self.shift
    }

    /// Extracts the field value from `addr`.
    ///
    /// # Arguments
    ///
    /// * `addr` - Raw physical address.
    ///
    /// # Returns
    ///
    /// The field bits, right-aligned.
    #[inline]
    pub const fn extract(&self, addr: u64) -> u64 {
        (addr >> self.shift) & self.low_mask()
    }

    /// Number of distinct values the field can take.
    #[inline]
    pub const fn cardinality(&self) -> usize {
        1usize << self.width
    }

    /// Index one past the field's most significant bit.
    #[inline]
    pub const fn end(&self) -> u32 {
        self.shift + self.width
    }

    #[inline]
    const fn low_mask(&self) -> u64 {
        if self.width >= 64 {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        }
    }
}

/// Decoded DRAM coordinates of a physical address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct DramAddress {
    /// Bank group index.
    pub bank_group: usize,
    /// Bank index within the bank group.
    pub bank: usize,
    /// Row index within the bank.
    pub row: u64,
    /// Column index within the row.
    pub column: u64,
}

/// Fixed bit-field layout used to decode physical addresses.
///
/// # Examples
///
/// ```
/// use dramsched_core::common::addr::{AddressField, AddressMapping};
///
/// let mapping = AddressMapping {
///     bank_group: AddressField::new(6, 2),
///     bank: AddressField::new(8, 2),
///     column: AddressField::new(10, 8),
///     row: AddressField::new(18, 15),
/// };
/// let addr = (0x1ABC << 18) | (0x5A << 10) | (0b10 << 8) | (0b01 << 6);
/// let decoded = mapping.decode(addr);
/// assert_eq!(decoded.bank_group, 1);
/// assert_eq!(decoded.bank, 2);
/// assert_eq!(decoded.column, 0x5A);
/// assert_eq!(decoded.row, 0x1ABC);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AddressMapping {
    /// Bank-group select bits.
    pub bank_group: AddressField,
    /// Bank select bits.
    pub bank: AddressField,
    /// Row bits.
    pub row: AddressField,
    /// Column bits.
    pub column: AddressField,
}

impl AddressMapping {
    /// Decodes `addr` into bank group, bank, row and column.
    #[inline]
    pub const fn decode(&self, addr: u64) -> DramAddress {
        DramAddress {
            bank_group: self.bank_group.extract(addr) as usize,
            bank: self.bank.extract(addr) as usize,
            row: self.row.extract(addr),
            column: self.column.extract(addr),
        }
    }

    /// Number of bank groups addressable by the mapping.
    pub const fn bank_groups(&self) -> usize {
        self.bank_group.cardinality()
    }

    /// Number of banks in each bank group.
    pub const fn banks_per_group(&self) -> usize {
        self.bank.cardinality()
    }

    /// Returns the four fields with their names, in a fixed order.
    pub const fn fields(&self) -> [(&'static str, AddressField); 4] {
        [
            ("bank_group", self.bank_group),
            ("bank", self.bank),
            ("row", self.row),
            ("column", self.column),
        ]
    }
}
