//! Global constants.
//!
//! This module defines the values shared by entries, extractors and the
//! configuration layer:
//! 1. **Sentinel:** The tag an invalid entry carries.
//! 2. **Granularity Defaults:** Line, page and sector sizes used when a
//!    configuration leaves them out.

/// Largest representable address.
///
/// Invalid entries hold this value as their tag so a stale read never looks
/// like a real tag from the low end of the address space.
pub const MAX_ADDR: u64 = u64::MAX;

/// Default cache line size in bytes (64 bytes).
pub const DEFAULT_LINE_BYTES: u64 = 64;

/// Default page size in bytes (4 KiB).
pub const DEFAULT_PAGE_BYTES: u64 = 4096;

/// Default number of sets for set-associative tag extraction.
pub const DEFAULT_NUM_SETS: u64 = 64;

/// Default sector size in bytes for sector entries.
pub const DEFAULT_SECTOR_BYTES: u64 = 16;

/// Upper bound on sectors per entry; the valid mask is a single `u64`.
pub const MAX_SECTORS: u32 = 64;
