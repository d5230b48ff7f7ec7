//! Configuration of tag granularity.
//!
//! This module defines how a structure's tags are derived from addresses. It
//! provides:
//! 1. **Defaults:** Baseline line, page and sector sizes.
//! 2. **Structures:** `TagConfig` and `SectorConfig`, deserialized from JSON.
//! 3. **Enums:** `Granularity`, the family of tag extractors a structure can use.
//!
//! One `TagConfig` builds the single [`SharedTagExtractor`] handed to every
//! entry of a structure. Its [`Granularity::set_index`] gives the indexing
//! policy the set selection that is consistent with those tags.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::cache::extractor::{
    ExactTagExtractor, LineTagExtractor, SetAssocTagExtractor, SharedTagExtractor,
};
use crate::cache::sector::SectorGeometry;
use crate::common::addr::{Addr, floor_log2};
use crate::common::constants::{DEFAULT_LINE_BYTES, DEFAULT_SECTOR_BYTES, MAX_SECTORS};
use crate::common::error::ConfigError;

/// Default configuration values used by serde when a field is omitted.
mod defaults {
    use crate::common::constants;

    /// Cache line size in bytes.
    pub const fn line_bytes() -> u64 {
        constants::DEFAULT_LINE_BYTES
    }

    /// Number of sets.
    pub const fn num_sets() -> u64 {
        constants::DEFAULT_NUM_SETS
    }

    /// Page size in bytes.
    pub const fn page_bytes() -> u64 {
        constants::DEFAULT_PAGE_BYTES
    }

    /// Sector size in bytes.
    pub const fn sector_bytes() -> u64 {
        constants::DEFAULT_SECTOR_BYTES
    }

    /// Sectors per entry (a 64-byte line of 16-byte sectors).
    pub const fn sectors() -> u32 {
        4
    }
}

/// How tags are derived from addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "PascalCase")]
pub enum Granularity {
    /// Tag is the line number: `addr >> log2(line_bytes)`.
    Line {
        /// Line size in bytes.
        #[serde(default = "defaults::line_bytes")]
        line_bytes: u64,
    },
    /// Tag excludes both the line offset and the set index bits.
    #[serde(alias = "SetAssoc")]
    SetAssociative {
        /// Line size in bytes.
        #[serde(default = "defaults::line_bytes")]
        line_bytes: u64,
        /// Number of sets.
        #[serde(default = "defaults::num_sets")]
        num_sets: u64,
    },
    /// Tag is the page number, as in a TLB.
    Page {
        /// Page size in bytes.
        #[serde(default = "defaults::page_bytes")]
        page_bytes: u64,
    },
    /// Tag is the full address, as in a BTB keyed by PC.
    Exact,
}

impl Default for Granularity {
    fn default() -> Self {
        Self::Line {
            line_bytes: DEFAULT_LINE_BYTES,
        }
    }
}

impl Granularity {
    /// Checks that every size is a non-zero power of two.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Line { line_bytes } => pow2("line_bytes", line_bytes).map(drop),
            Self::SetAssociative {
                line_bytes,
                num_sets,
            } => {
                let _ = pow2("line_bytes", line_bytes)?;
                pow2("num_sets", num_sets).map(drop)
            }
            Self::Page { page_bytes } => pow2("page_bytes", page_bytes).map(drop),
            Self::Exact => Ok(()),
        }
    }

    /// Number of low address bits removed to form a tag.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] if the granularity is invalid.
    pub fn tag_shift(&self) -> Result<u32, ConfigError> {
        match *self {
            Self::Line { line_bytes } => pow2("line_bytes", line_bytes),
            Self::SetAssociative {
                line_bytes,
                num_sets,
            } => Ok(pow2("line_bytes", line_bytes)? + pow2("num_sets", num_sets)?),
            Self::Page { page_bytes } => pow2("page_bytes", page_bytes),
            Self::Exact => Ok(0),
        }
    }

    /// Set an address maps to, for set-associative granularity.
    ///
    /// Other granularities have no set component and always yield set 0.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] if the granularity is invalid.
    pub fn set_index(&self, addr: Addr) -> Result<usize, ConfigError> {
        match *self {
            Self::SetAssociative {
                line_bytes,
                num_sets,
            } => {
                let offset_bits = pow2("line_bytes", line_bytes)?;
                let set_bits = pow2("num_sets", num_sets)?;
                Ok(SetAssocTagExtractor::new(offset_bits, set_bits).set_index(addr))
            }
            _ => {
                self.validate()?;
                Ok(0)
            }
        }
    }

    /// Bytes covered by one tag, or `None` for exact tags.
    ///
    /// For set-associative granularity this is the line size: set index bits
    /// are not part of a line's contents.
    pub const fn granule_bytes(&self) -> Option<u64> {
        match *self {
            Self::Line { line_bytes } | Self::SetAssociative { line_bytes, .. } => {
                Some(line_bytes)
            }
            Self::Page { page_bytes } => Some(page_bytes),
            Self::Exact => None,
        }
    }

    /// Builds the extractor for this granularity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] if the granularity is invalid.
    pub fn build_extractor(&self) -> Result<SharedTagExtractor, ConfigError> {
        let extractor: SharedTagExtractor = match *self {
            Self::Line { line_bytes } => {
                Arc::new(LineTagExtractor::new(pow2("line_bytes", line_bytes)?))
            }
            Self::SetAssociative {
                line_bytes,
                num_sets,
            } => Arc::new(SetAssocTagExtractor::new(
                pow2("line_bytes", line_bytes)?,
                pow2("num_sets", num_sets)?,
            )),
            Self::Page { page_bytes } => {
                Arc::new(LineTagExtractor::new(pow2("page_bytes", page_bytes)?))
            }
            Self::Exact => Arc::new(ExactTagExtractor),
        };
        Ok(extractor)
    }
}

/// Sector layout for sector entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SectorConfig {
    /// Sector size in bytes.
    #[serde(default = "defaults::sector_bytes")]
    pub sector_bytes: u64,

    /// Sectors per entry (1..=64).
    #[serde(default = "defaults::sectors")]
    pub sectors: u32,
}

impl Default for SectorConfig {
    fn default() -> Self {
        Self {
            sector_bytes: DEFAULT_SECTOR_BYTES,
            sectors: defaults::sectors(),
        }
    }
}

impl SectorConfig {
    /// Validates the layout and converts it to a [`SectorGeometry`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] for a bad sector size or
    /// [`ConfigError::SectorCount`] for a count outside `1..=64`.
    pub fn geometry(&self) -> Result<SectorGeometry, ConfigError> {
        let shift = pow2("sector_bytes", self.sector_bytes)?;
        if self.sectors == 0 || self.sectors > MAX_SECTORS {
            return Err(ConfigError::SectorCount(self.sectors));
        }
        Ok(SectorGeometry::new(shift, self.sectors))
    }
}

/// Tag configuration of one associative structure.
///
/// # Examples
///
/// ```
/// use tagsim_core::config::TagConfig;
///
/// let json = r#"{
///     "granularity": { "kind": "SetAssociative", "line_bytes": 64, "num_sets": 128 },
///     "sector": { "sector_bytes": 16, "sectors": 4 }
/// }"#;
///
/// let config = TagConfig::from_json(json).unwrap();
/// assert_eq!(config.granularity.tag_shift().unwrap(), 13);
/// assert_eq!(config.sector.unwrap().sectors, 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TagConfig {
    /// Tag derivation; defaults to 64-byte lines.
    #[serde(default)]
    pub granularity: Granularity,

    /// Sector layout, when the structure uses sector entries.
    #[serde(default)]
    pub sector: Option<SectorConfig>,
}

impl TagConfig {
    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input, or a validation error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`TagConfig::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks granularity and sector layout.
    ///
    /// Sectors must tile one tag granule exactly: `sector_bytes * sectors`
    /// equals the line (or page) size. Otherwise two sectors under the same
    /// tag would share a valid bit, or part of the granule would have none.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found, including
    /// [`ConfigError::SectorSpan`] and [`ConfigError::SectorsWithExact`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.granularity.validate()?;
        let Some(sector) = &self.sector else {
            return Ok(());
        };
        let _ = sector.geometry()?;
        let Some(line_bytes) = self.granularity.granule_bytes() else {
            return Err(ConfigError::SectorsWithExact);
        };
        let span = u64::from(sector.sectors).checked_mul(sector.sector_bytes);
        if span != Some(line_bytes) {
            return Err(ConfigError::SectorSpan {
                sector_bytes: sector.sector_bytes,
                sectors: sector.sectors,
                line_bytes,
            });
        }
        Ok(())
    }

    /// Builds the extractor shared by every entry of the structure.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] if the granularity is invalid.
    pub fn build_extractor(&self) -> Result<SharedTagExtractor, ConfigError> {
        self.granularity.build_extractor()
    }
}

/// Returns log2 of `value`, rejecting zero and non powers of two.
fn pow2(field: &'static str, value: u64) -> Result<u32, ConfigError> {
    if value.is_power_of_two() {
        floor_log2(value).ok_or(ConfigError::NotPowerOfTwo { field, value })
    } else {
        Err(ConfigError::NotPowerOfTwo { field, value })
    }
}
