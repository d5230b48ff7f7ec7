//! SectorEntry Unit Tests.
//!
//! 64-byte lines of four 16-byte sectors. Verifies that the base contract
//! holds and that sector presence is tracked per fill.

use pretty_assertions::assert_eq;
use tagsim_core::cache::{SectorGeometry, TaggedEntry};
use tagsim_core::common::{EntryError, MAX_ADDR};

use crate::common::harness::{capture_logs, sector_entry};

#[test]
fn geometry_clamps_sector_count() {
    assert_eq!(SectorGeometry::new(4, 0).sectors(), 1);
    assert_eq!(SectorGeometry::new(4, 100).sectors(), 64);
    assert_eq!(SectorGeometry::new(4, 4).sector_of(0x1030), 3);
    assert_eq!(SectorGeometry::new(4, 4).sector_of(0x1040), 0);
}

#[test]
fn insert_marks_only_the_touched_sector() {
    let mut entry = sector_entry();
    assert!(!entry.is_valid());

    entry.insert(0x1010);
    assert!(entry.is_valid());
    assert_eq!(entry.tag(), 0x40);
    assert_eq!(entry.valid_mask(), 0b0010);

    assert!(entry.matches(0x1000), "tag-level match ignores sectors");
    assert!(entry.sector_valid(0x1010));
    assert!(!entry.sector_valid(0x1000));
    assert!(!entry.matches(0x1040));
}

#[test]
fn fill_sector_extends_mask() {
    let mut entry = sector_entry();
    entry.insert(0x1000);
    entry.fill_sector(0x1030);
    entry.fill_sector(0x1030);
    assert_eq!(entry.valid_mask(), 0b1001);
    assert!(entry.sector_valid(0x103F));
}

#[test]
fn fill_sector_rejects_invalid_and_foreign_tags() {
    let mut entry = sector_entry();
    assert_eq!(
        entry.try_fill_sector(0x1000),
        Err(EntryError::NotValid { addr: 0x1000 })
    );

    entry.insert(0x1000);
    assert_eq!(
        entry.try_fill_sector(0x1040),
        Err(EntryError::SectorTagMismatch {
            addr: 0x1040,
            tag: 0x40
        })
    );
    assert_eq!(entry.valid_mask(), 0b0001);
}

#[test]
#[should_panic(expected = "into a valid entry")]
fn double_insert_panics() {
    let mut entry = sector_entry();
    entry.insert(0x1000);
    entry.insert(0x1010);
}

#[test]
#[should_panic(expected = "does not match entry tag")]
fn foreign_fill_panics() {
    let mut entry = sector_entry();
    entry.insert(0x1000);
    entry.fill_sector(0x2000);
}

#[test]
fn invalidate_clears_every_sector() {
    let mut entry = sector_entry();
    entry.insert(0x1000);
    entry.fill_sector(0x1010);
    entry.invalidate();
    entry.invalidate();

    assert!(!entry.is_valid());
    assert_eq!(entry.valid_mask(), 0);
    assert_eq!(entry.tag(), MAX_ADDR);
    assert!(!entry.matches(0x1000));
    assert!(!entry.sector_valid(0x1000));

    entry.insert(0x2020);
    assert_eq!(entry.valid_mask(), 0b0100);
}

#[test]
fn invalidate_logs_only_valid_entries() {
    let mut entry = sector_entry();
    let idle = capture_logs(|| entry.invalidate());
    assert!(!idle.contains("entry invalidated"), "{idle}");

    entry.insert(0x1000);
    let logs = capture_logs(|| entry.invalidate());
    assert!(logs.contains("entry invalidated"), "{logs}");
    assert!(logs.contains("tag=64"), "{logs}");
}

#[test]
fn display_includes_sector_mask() {
    let mut entry = sector_entry();
    entry.replaceable_mut().set_position(1, 2);
    entry.insert(0x1000);
    entry.fill_sector(0x1020);
    assert_eq!(
        entry.to_string(),
        "tag: 0x40 valid: 1 sectors: 0b0101 | set: 0x1 way: 0x2"
    );
}
