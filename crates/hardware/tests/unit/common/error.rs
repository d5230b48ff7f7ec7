//! # Error Rendering Tests

use tagsim_core::common::{ConfigError, EntryError};

#[test]
fn already_valid_names_address_and_entry() {
    let err = EntryError::AlreadyValid {
        addr: 0x2000,
        tag: 0x40,
        entry: "tag: 0x40 valid: 1 | set: 0x0 way: 0x0".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "insert of 0x2000 into a valid entry (tag: 0x40 valid: 1 | set: 0x0 way: 0x0)"
    );
}

#[test]
fn sector_errors_render_hex() {
    let err = EntryError::SectorTagMismatch {
        addr: 0x1040,
        tag: 0x40,
    };
    assert_eq!(
        err.to_string(),
        "sector fill of 0x1040 does not match entry tag 0x40"
    );
    assert_eq!(
        EntryError::NotValid { addr: 0x10 }.to_string(),
        "sector fill of 0x10 into an invalid entry"
    );
}

#[test]
fn config_errors_render() {
    let err = ConfigError::NotPowerOfTwo {
        field: "line_bytes",
        value: 48,
    };
    assert_eq!(
        err.to_string(),
        "line_bytes must be a non-zero power of two, got 48"
    );
    assert_eq!(
        ConfigError::SectorCount(65).to_string(),
        "sector count 65 is out of range (1..=64)"
    );
}
