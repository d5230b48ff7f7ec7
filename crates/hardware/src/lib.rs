//! Tagged cache-entry library.
//!
//! This crate implements the storage slot every associative structure of a
//! simulated memory system is built from:
//! 1. **Entries:** The `TaggedEntry` contract, the base `CacheEntry` and the
//!    sector-tracking `SectorEntry`.
//! 2. **Extraction:** Tag extractors that fix the granularity of a structure
//!    (line, set-associative, page, exact).
//! 3. **Bookkeeping:** Per-entry position and recency markers for
//!    replacement policies.
//! 4. **Configuration:** JSON tag configuration that builds the shared
//!    extractor and the matching set index.

/// Tagged entries, extractors and replacement bookkeeping.
pub mod cache;
/// Common types and constants (addresses, sentinel tag, errors).
pub mod common;
/// Tag granularity configuration (defaults, enums, JSON loading).
pub mod config;

/// Base entry type; construct with a shared extractor.
pub use crate::cache::CacheEntry;
/// Entry trait implemented by every entry kind.
pub use crate::cache::TaggedEntry;
/// Root configuration type; use `TagConfig::default()` or load from JSON.
pub use crate::config::TagConfig;
