//! Tagged storage slots for caches, TLBs and predictors.
//!
//! This module provides the entry-level building blocks an associative
//! structure is made of. The structure itself (set array, indexing,
//! replacement) owns the entries and drives them through
//! [`TaggedEntry`]:
//!
//! 1. **Lookup:** Call [`TaggedEntry::matches`] on each candidate.
//! 2. **Fill:** Pick a victim, [`TaggedEntry::invalidate`] it, then
//!    [`TaggedEntry::insert`].
//! 3. **Bookkeeping:** Record position and recency through
//!    [`TaggedEntry::replaceable_mut`].

/// Base tagged entry and the entry trait.
pub mod entry;

/// Tag extraction strategies.
pub mod extractor;

/// Replacement-policy bookkeeping embedded in every entry.
pub mod replaceable;

/// Entries with a per-sector valid mask.
pub mod sector;

pub use entry::{CacheEntry, TaggedEntry};
pub use extractor::{
    ExactTagExtractor, LineTagExtractor, SetAssocTagExtractor, SharedTagExtractor, TagExtractor,
};
pub use replaceable::ReplaceableEntry;
pub use sector::{SectorEntry, SectorGeometry};
