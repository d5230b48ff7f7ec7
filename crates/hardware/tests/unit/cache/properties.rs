//! Entry Property Tests.
//!
//! Checks the entry contract over arbitrary addresses and line sizes with
//! `proptest`.

use std::sync::Arc;

use proptest::prelude::*;
use tagsim_core::cache::{CacheEntry, LineTagExtractor, TagExtractor, TaggedEntry};
use tagsim_core::common::MAX_ADDR;

fn entry_with_shift(shift: u32) -> CacheEntry {
    CacheEntry::new(Arc::new(LineTagExtractor::new(shift)))
}

proptest! {
    #[test]
    fn fresh_entry_never_matches(shift in 0u32..=16, addr in any::<u64>()) {
        let entry = entry_with_shift(shift);
        prop_assert!(!entry.is_valid());
        prop_assert!(!entry.matches(addr));
    }

    #[test]
    fn insert_then_match(shift in 0u32..=16, addr in any::<u64>()) {
        let mut entry = entry_with_shift(shift);
        entry.insert(addr);
        prop_assert!(entry.is_valid());
        prop_assert!(entry.matches(addr));
        prop_assert_eq!(entry.tag(), addr >> shift);
    }

    #[test]
    fn distinct_tags_do_not_match(shift in 0u32..=16, a in any::<u64>(), b in any::<u64>()) {
        let ext = LineTagExtractor::new(shift);
        prop_assume!(ext.extract_tag(a) != ext.extract_tag(b));

        let mut entry = entry_with_shift(shift);
        entry.insert(a);
        prop_assert!(!entry.matches(b));
    }

    #[test]
    fn invalidate_clears(shift in 0u32..=16, addr in any::<u64>(), lookup in any::<u64>()) {
        let mut entry = entry_with_shift(shift);
        entry.insert(addr);
        entry.invalidate();
        prop_assert!(!entry.is_valid());
        prop_assert_eq!(entry.tag(), MAX_ADDR);
        prop_assert!(!entry.matches(addr));
        prop_assert!(!entry.matches(lookup));
    }

    #[test]
    fn second_insert_is_rejected(a in any::<u64>(), b in any::<u64>()) {
        let mut entry = entry_with_shift(6);
        entry.insert(a);
        prop_assert!(entry.try_insert(b).is_err());
        prop_assert_eq!(entry.tag(), a >> 6);
    }

    #[test]
    fn match_is_pure(addr in any::<u64>(), lookups in prop::collection::vec(any::<u64>(), 0..16)) {
        let mut entry = entry_with_shift(6);
        entry.insert(addr);
        let before = entry.to_string();
        for lookup in lookups {
            let _ = entry.matches(lookup);
        }
        prop_assert_eq!(entry.to_string(), before);
    }
}
