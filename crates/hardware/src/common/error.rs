//! Error definitions.
//!
//! This module defines the two error families of the crate:
//! 1. **Entry Errors:** Precondition violations on tagged entries. These are
//!    programming errors in the owning tag store; the panicking entry
//!    operations turn them into an immediate fault.
//! 2. **Configuration Errors:** Rejected tag granularity settings and
//!    failures while loading a configuration.

use thiserror::Error;

use super::addr::Addr;
use super::constants::MAX_SECTORS;

/// Precondition violation on a tagged entry.
///
/// None of these are recoverable: a caller that receives one from a checked
/// operation (such as [`try_insert`](crate::cache::TaggedEntry::try_insert))
/// has a bug in its eviction or fill sequencing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// `insert` was called on an entry that is already valid.
    ///
    /// Entries must be invalidated before they are refilled.
    #[error("insert of {addr:#x} into a valid entry ({entry})")]
    AlreadyValid {
        /// Address passed to `insert`.
        addr: Addr,
        /// Tag the entry held when the insert was attempted.
        tag: Addr,
        /// Diagnostic rendering of the offending entry.
        entry: String,
    },

    /// A sector fill was attempted on an entry holding no tag.
    #[error("sector fill of {addr:#x} into an invalid entry")]
    NotValid {
        /// Address passed to the sector fill.
        addr: Addr,
    },

    /// A sector fill named an address belonging to a different tag.
    #[error("sector fill of {addr:#x} does not match entry tag {tag:#x}")]
    SectorTagMismatch {
        /// Address passed to the sector fill.
        addr: Addr,
        /// Tag currently held by the entry.
        tag: Addr,
    },
}

/// Errors raised while loading or validating a tag configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A size that must be a non-zero power of two was not.
    #[error("{field} must be a non-zero power of two, got {value}")]
    NotPowerOfTwo {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: u64,
    },

    /// The sector count is outside `1..=MAX_SECTORS`.
    #[error("sector count {0} is out of range (1..={max})", max = MAX_SECTORS)]
    SectorCount(u32),

    /// The sectors of an entry do not tile exactly one tag's worth of bytes.
    #[error("{sectors} sectors of {sector_bytes} bytes do not span the {line_bytes}-byte tag granule")]
    SectorSpan {
        /// Sector size in bytes.
        sector_bytes: u64,
        /// Sectors per entry.
        sectors: u32,
        /// Bytes covered by one tag.
        line_bytes: u64,
    },

    /// Sectors were configured for a granularity without a line size.
    #[error("sector entries need a line or page granularity, not exact tags")]
    SectorsWithExact,

    /// The configuration could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}
