//! Tag Store Flow Tests.
//!
//! Drives entries through the lookup → miss → invalidate → insert sequence of
//! a small set-associative tag store. The store shares one extractor between
//! its indexing and its entries.
//!
//! Geometry: 64-byte lines, 4 sets, 2 ways.
//!   set = (addr >> 6) & 3
//!   tag = addr >> 8

use tagsim_core::cache::{SectorEntry, SectorGeometry, TaggedEntry};

use crate::common::harness::init_tracing;
use crate::common::mocks::tag_store::{Access, MockTagStore};

fn store() -> MockTagStore<tagsim_core::CacheEntry> {
    init_tracing();
    MockTagStore::with_cache_entries(6, 2, 2)
}

#[test]
fn cold_miss_fills_first_invalid_way() {
    let mut tags = store();
    assert_eq!(
        tags.access(0x1000),
        Access::Fill {
            set: 0,
            way: 0,
            evicted: None
        }
    );
    assert_eq!(tags.access(0x1004), Access::Hit { set: 0, way: 0 });
    assert_eq!(tags.entry(0, 0).tag(), 0x10);
}

#[test]
fn entries_know_their_position() {
    let tags = store();
    assert_eq!(tags.entry(3, 1).replaceable().set(), 3);
    assert_eq!(tags.entry(3, 1).replaceable().way(), 1);
}

#[test]
fn same_set_different_tags_use_both_ways() {
    let mut tags = store();
    let _ = tags.access(0x1000);
    assert_eq!(
        tags.access(0x1100),
        Access::Fill {
            set: 0,
            way: 1,
            evicted: None
        }
    );
    assert_eq!(tags.lookup(0x1000), Some((0, 0)));
    assert_eq!(tags.lookup(0x1100), Some((0, 1)));
    assert_eq!(tags.lookup(0x1040), None, "different set");
}

#[test]
fn conflict_miss_evicts_least_recent() {
    let mut tags = store();
    let _ = tags.access(0x1000);
    let _ = tags.access(0x1100);
    let _ = tags.access(0x1000);

    assert_eq!(
        tags.access(0x1200),
        Access::Fill {
            set: 0,
            way: 1,
            evicted: Some(0x11)
        }
    );
    assert_eq!(tags.lookup(0x1100), None);
    assert_eq!(tags.lookup(0x1000), Some((0, 0)));
    assert_eq!(tags.lookup(0x1200), Some((0, 1)));
}

#[test]
fn explicit_eviction_frees_the_way() {
    let mut tags = store();
    let _ = tags.access(0x1000);
    assert!(tags.evict(0x1010));
    assert!(!tags.evict(0x1010));
    assert!(!tags.entry(0, 0).is_valid());
    assert_eq!(tags.entry(0, 0).replaceable().last_touch(), None);

    assert_eq!(
        tags.access(0x2000),
        Access::Fill {
            set: 0,
            way: 0,
            evicted: None
        }
    );
}

#[test]
#[should_panic(expected = "into a valid entry")]
fn skipping_invalidate_faults() {
    let mut tags = store();
    let _ = tags.access(0x1000);
    tags.entry_mut(0, 0).insert(0x1100);
}

#[test]
fn sector_entries_satisfy_the_same_flow() {
    init_tracing();
    let mut tags = MockTagStore::new(6, 2, 2, |ext| {
        SectorEntry::new(ext, SectorGeometry::new(4, 4))
    });
    let _ = tags.access(0x1000);
    assert_eq!(tags.access(0x1030), Access::Hit { set: 0, way: 0 });

    tags.entry_mut(0, 0).fill_sector(0x1030);
    assert!(tags.entry(0, 0).sector_valid(0x1030));
    assert!(!tags.entry(0, 0).sector_valid(0x1010));
}
