//! Tag Extractors.
//!
//! A tag extractor reduces a full address to the value that identifies
//! "same content" at a structure's granularity. Entries hold a shared handle
//! to one and call it on every fill and every match; the indexing policy of
//! the owning structure is expected to strip the same low bits.
//!
//! # Extractors
//!
//! - `LineTagExtractor`: Drops the byte offset inside a line (or page).
//! - `SetAssocTagExtractor`: Drops the line offset and the set index bits.
//! - `ExactTagExtractor`: Uses the whole address as the tag.
//!
//! Any `Fn(Addr) -> Addr + Send + Sync` closure is also an extractor.

use std::sync::Arc;

use crate::common::addr::{Addr, shift_right};

/// Derives a tag from a full address.
///
/// Implementations must be pure: the same address always yields the same tag,
/// and concurrent calls from different entries are allowed.
pub trait TagExtractor: Send + Sync {
    /// Returns the tag for `addr`.
    fn extract_tag(&self, addr: Addr) -> Addr;
}

impl<F> TagExtractor for F
where
    F: Fn(Addr) -> Addr + Send + Sync,
{
    #[inline(always)]
    fn extract_tag(&self, addr: Addr) -> Addr {
        self(addr)
    }
}

/// Shared, non-owning handle to an extractor.
///
/// The configuration that builds a tag store clones one handle into every
/// entry and another into its indexing policy.
pub type SharedTagExtractor = Arc<dyn TagExtractor>;

/// Wraps a closure into a [`SharedTagExtractor`].
///
/// # Arguments
///
/// * `f` - Pure function mapping an address to its tag.
pub fn shared<F>(f: F) -> SharedTagExtractor
where
    F: Fn(Addr) -> Addr + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Tag extractor for line or page granularity.
///
/// The tag is the address with its `shift` low offset bits removed, i.e. the
/// line (or page) number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineTagExtractor {
    shift: u32,
}

impl LineTagExtractor {
    /// Creates an extractor that drops `shift` offset bits.
    ///
    /// # Arguments
    ///
    /// * `shift` - log2 of the line (or page) size in bytes.
    pub const fn new(shift: u32) -> Self {
        Self { shift }
    }

    /// Returns the number of offset bits removed from each address.
    pub const fn shift(&self) -> u32 {
        self.shift
    }
}

impl TagExtractor for LineTagExtractor {
    #[inline(always)]
    fn extract_tag(&self, addr: Addr) -> Addr {
        shift_right(addr, self.shift)
    }
}

/// Tag extractor for set-associative structures.
///
/// Removes the line offset and the set index, keeping only the bits the
/// indexing policy does not already encode in the set position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetAssocTagExtractor {
    offset_bits: u32,
    set_bits: u32,
}

impl SetAssocTagExtractor {
    /// Creates a set-associative extractor.
    ///
    /// # Arguments
    ///
    /// * `offset_bits` - log2 of the line size in bytes.
    /// * `set_bits` - log2 of the number of sets.
    pub const fn new(offset_bits: u32, set_bits: u32) -> Self {
        Self {
            offset_bits,
            set_bits,
        }
    }

    /// Total number of low bits removed to form the tag.
    ///
    /// Saturates; any shift of 64 or more yields a zero tag.
    pub const fn tag_shift(&self) -> u32 {
        self.offset_bits.saturating_add(self.set_bits)
    }

    /// Returns the set an address maps to under the same geometry.
    ///
    /// # Arguments
    ///
    /// * `addr` - The address to index.
    pub const fn set_index(&self, addr: Addr) -> usize {
        let line = shift_right(addr, self.offset_bits);
        match 1u64.checked_shl(self.set_bits) {
            Some(sets) => (line & (sets - 1)) as usize,
            None => line as usize,
        }
    }
}

impl TagExtractor for SetAssocTagExtractor {
    #[inline(always)]
    fn extract_tag(&self, addr: Addr) -> Addr {
        shift_right(addr, self.tag_shift())
    }
}

/// Identity extractor: the full address is the tag.
///
/// Matches structures such as a BTB that compare the whole PC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExactTagExtractor;

impl TagExtractor for ExactTagExtractor {
    #[inline(always)]
    fn extract_tag(&self, addr: Addr) -> Addr {
        addr
    }
}

