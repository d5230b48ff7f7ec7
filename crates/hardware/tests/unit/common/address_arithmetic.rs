//! # Address Helper Tests

use rstest::rstest;
use tagsim_core::common::addr::{floor_log2, shift_right};

#[rstest]
#[case(1, 0)]
#[case(2, 1)]
#[case(64, 6)]
#[case(65, 6)]
#[case(4096, 12)]
#[case(u64::MAX, 63)]
fn floor_log2_of_nonzero(#[case] value: u64, #[case] expected: u32) {
    assert_eq!(floor_log2(value), Some(expected));
}

#[test]
fn floor_log2_of_zero_is_none() {
    assert_eq!(floor_log2(0), None);
}

#[test]
fn shift_right_saturates_to_zero() {
    assert_eq!(shift_right(0x1000, 6), 0x40);
    assert_eq!(shift_right(u64::MAX, 64), 0);
    assert_eq!(shift_right(u64::MAX, 200), 0);
    assert_eq!(shift_right(0xABCD, 0), 0xABCD);
}
