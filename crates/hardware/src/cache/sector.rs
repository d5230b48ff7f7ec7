//! Sector Entries.
//!
//! A sector entry keeps one tag for a group of contiguous sectors and a valid
//! bit per sector. The entry counts as valid while any sector is valid, so
//! lookup code written against [`TaggedEntry`] sees the same contract as for a
//! [`CacheEntry`](super::CacheEntry). Sector-aware code can additionally ask
//! which sectors are present and fill missing ones under the existing tag.
//!
//! Only presence is tracked here; sector data lives with the owning structure.

use std::fmt;

use super::entry::{TaggedEntry, fatal};
use super::extractor::SharedTagExtractor;
use super::replaceable::ReplaceableEntry;
use crate::common::addr::{Addr, shift_right};
use crate::common::constants::{MAX_ADDR, MAX_SECTORS};
use crate::common::error::EntryError;

/// Shape of the sectors covered by one entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectorGeometry {
    sector_shift: u32,
    sectors: u32,
}

impl SectorGeometry {
    /// Creates a geometry of `sectors` sectors of `1 << sector_shift` bytes.
    ///
    /// The sector count is clamped to `1..=MAX_SECTORS`; validated sizes come
    /// from [`SectorConfig`](crate::config::SectorConfig).
    ///
    /// # Arguments
    ///
    /// * `sector_shift` - log2 of the sector size in bytes.
    /// * `sectors` - Number of sectors per entry.
    pub const fn new(sector_shift: u32, sectors: u32) -> Self {
        let sectors = if sectors == 0 {
            1
        } else if sectors > MAX_SECTORS {
            MAX_SECTORS
        } else {
            sectors
        };
        Self {
            sector_shift,
            sectors,
        }
    }

    /// log2 of the sector size in bytes.
    pub const fn sector_shift(&self) -> u32 {
        self.sector_shift
    }

    /// Number of sectors per entry.
    pub const fn sectors(&self) -> u32 {
        self.sectors
    }

    /// Index of the sector `addr` falls in.
    ///
    /// # Arguments
    ///
    /// * `addr` - The address to locate.
    pub const fn sector_of(&self, addr: Addr) -> u32 {
        (shift_right(addr, self.sector_shift) % self.sectors as u64) as u32
    }
}

/// Tagged entry with a per-sector valid mask.
#[derive(Clone)]
pub struct SectorEntry {
    extractor: SharedTagExtractor,
    geometry: SectorGeometry,
    valid_mask: u64,
    tag: Addr,
    repl: ReplaceableEntry,
}

impl SectorEntry {
    /// Creates an invalid sector entry.
    ///
    /// # Arguments
    ///
    /// * `extractor` - Shared tag extractor. Its line (or page) size must
    ///   equal `sectors << sector_shift` so every sector of a tag has its own
    ///   valid bit; [`TagConfig::validate`](crate::config::TagConfig::validate)
    ///   enforces this for configured structures.
    /// * `geometry` - Sector size and count.
    pub fn new(extractor: SharedTagExtractor, geometry: SectorGeometry) -> Self {
        Self {
            extractor,
            geometry,
            valid_mask: 0,
            tag: MAX_ADDR,
            repl: ReplaceableEntry::new(),
        }
    }

    /// Sector geometry of this entry.
    pub const fn geometry(&self) -> SectorGeometry {
        self.geometry
    }

    /// Bit `i` is set when sector `i` is present.
    pub const fn valid_mask(&self) -> u64 {
        self.valid_mask
    }

    /// Returns `true` if the entry holds the tag of `addr` and the sector
    /// `addr` falls in is present.
    pub fn sector_valid(&self, addr: Addr) -> bool {
        self.matches(addr) && self.valid_mask & self.sector_bit(addr) != 0
    }

    /// Marks the sector of `addr` present under the current tag.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::NotValid`] if the entry holds no tag, or
    /// [`EntryError::SectorTagMismatch`] if `addr` belongs to another tag.
    pub fn try_fill_sector(&mut self, addr: Addr) -> Result<(), EntryError> {
        if !self.is_valid() {
            return Err(EntryError::NotValid { addr });
        }
        if self.extract_tag(addr) != self.tag {
            return Err(EntryError::SectorTagMismatch {
                addr,
                tag: self.tag,
            });
        }
        self.valid_mask |= self.sector_bit(addr);
        tracing::trace!(addr, mask = self.valid_mask, "sector filled");
        Ok(())
    }

    /// Marks the sector of `addr` present under the current tag.
    ///
    /// # Panics
    ///
    /// Panics if the entry is invalid or holds a different tag.
    #[track_caller]
    pub fn fill_sector(&mut self, addr: Addr) {
        if let Err(err) = self.try_fill_sector(addr) {
            fatal(&err);
        }
    }

    fn sector_bit(&self, addr: Addr) -> u64 {
        1u64 << self.geometry.sector_of(addr)
    }
}

impl TaggedEntry for SectorEntry {
    #[inline(always)]
    fn is_valid(&self) -> bool {
        self.valid_mask != 0
    }

    #[inline(always)]
    fn tag(&self) -> Addr {
        self.tag
    }

    #[inline(always)]
    fn extract_tag(&self, addr: Addr) -> Addr {
        self.extractor.extract_tag(addr)
    }

    fn try_insert(&mut self, addr: Addr) -> Result<(), EntryError> {
        if self.is_valid() {
            return Err(EntryError::AlreadyValid {
                addr,
                tag: self.tag,
                entry: self.to_string(),
            });
        }
        self.tag = self.extractor.extract_tag(addr);
        self.valid_mask = self.sector_bit(addr);
        tracing::trace!(addr, tag = self.tag, "sector entry inserted");
        Ok(())
    }

    fn invalidate(&mut self) {
        if self.is_valid() {
            tracing::trace!(tag = self.tag, mask = self.valid_mask, "entry invalidated");
        }
        self.valid_mask = 0;
        self.tag = MAX_ADDR;
    }

    fn replaceable(&self) -> &ReplaceableEntry {
        &self.repl
    }

    fn replaceable_mut(&mut self) -> &mut ReplaceableEntry {
        &mut self.repl
    }
}

impl fmt::Display for SectorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tag: {:#x} valid: {} sectors: {:#0width$b} | {}",
            self.tag,
            u8::from(self.is_valid()),
            self.valid_mask,
            self.repl,
            width = self.geometry.sectors as usize + 2,
        )
    }
}

impl fmt::Debug for SectorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectorEntry")
            .field("geometry", &self.geometry)
            .field("valid_mask", &format_args!("{:#b}", self.valid_mask))
            .field("tag", &format_args!("{:#x}", self.tag))
            .field("repl", &self.repl)
            .finish_non_exhaustive()
    }
}
