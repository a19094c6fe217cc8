//! # Address Decoding Tests
//!
//! Field extraction, masks and the default DDR4-style layout.

use dramsched_core::common::{AddressField, DramAddress};
use dramsched_core::config::Config;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::builder::addr;

#[rstest]
#[case(AddressField::new(6, 2), 0b1100_0000)]
#[case(AddressField::new(0, 1), 0b1)]
#[case(AddressField::new(18, 15), 0x7FFF << 18)]
#[case(AddressField::new(0, 64), u64::MAX)]
fn field_mask(#[case] field: AddressField, #[case] expected: u64) {
    assert_eq!(field.mask(), expected);
}

#[test]
fn field_extract_ignores_neighbouring_bits() {
    let field = AddressField::new(8, 2);
    assert_eq!(field.extract(0xFFFF_FFFF), 0b11);
    assert_eq!(field.extract(0x0000_0200), 0b10);
    assert_eq!(field.extract(0x0000_00FF), 0);
}

#[test]
fn field_cardinality_and_end() {
    let field = AddressField::new(6, 2);
    assert_eq!(field.cardinality(), 4);
    assert_eq!(field.end(), 8);
    assert_eq!(AddressField::new(3, 0).cardinality(), 1);
}

#[test]
fn default_mapping_decodes_all_fields() {
    let mapping = Config::default().address_mapping();
    let decoded = mapping.decode(addr(2, 3, 0x1ABC, 0x7F));
    assert_eq!(
        decoded,
        DramAddress {
            bank_group: 2,
            bank: 3,
            row: 0x1ABC,
            column: 0x7F,
        }
    );
}

#[test]
fn default_mapping_ignores_offset_and_high_bits() {
    let mapping = Config::default().address_mapping();
    let base = addr(1, 2, 0x33, 0x44);
    assert_eq!(mapping.decode(base), mapping.decode(base | 0x3F));
    assert_eq!(mapping.decode(base), mapping.decode(base | (1 << 40)));
}

#[test]
fn default_mapping_has_four_by_four_banks() {
    let mapping = Config::default().address_mapping();
    assert_eq!(mapping.bank_groups(), 4);
    assert_eq!(mapping.banks_per_group(), 4);
}

#[test]
fn mapping_fields_are_named_in_order() {
    let mapping = Config::default().address_mapping();
    let names: Vec<&str> = mapping.fields().iter().map(|(n, _)| *n).collect();
    assert_eq!(names, ["bank_group", "bank", "row", "column"]);
}

proptest! {
    #[test]
    fn decoded_coordinates_stay_in_range(raw in any::<u64>()) {
        let mapping = Config::default().address_mapping();
        let d = mapping.decode(raw);
        prop_assert!(d.bank_group < mapping.bank_groups());
        prop_assert!(d.bank < mapping.banks_per_group());
        prop_assert!(d.row < (1 << 15));
        prop_assert!(d.column < (1 << 8));
    }
}
