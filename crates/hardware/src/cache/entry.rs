//! Tagged Entries.
//!
//! A tagged entry is one storage slot of an associative structure: a cache
//! line, a TLB page, a predictor bucket. It records whether the slot holds
//! meaningful content and, if it does, the tag of that content. Lookup code
//! asks every candidate entry [`matches`](TaggedEntry::matches) and nothing
//! else, so the contract below is what every cache, TLB and predictor built on
//! top of these entries relies on:
//!
//! 1. **Match:** `matches(addr)` holds exactly when the entry is valid and its
//!    tag equals the extracted tag of `addr`.
//! 2. **Insert:** Only an invalid entry may be filled. Filling a valid entry
//!    is a bug in the caller's eviction sequencing and faults immediately.
//! 3. **Invalidate:** Always allowed, idempotent, and resets the tag to
//!    [`MAX_ADDR`].

use std::fmt;

use super::extractor::SharedTagExtractor;
use super::replaceable::ReplaceableEntry;
use crate::common::addr::Addr;
use crate::common::constants::MAX_ADDR;
use crate::common::error::EntryError;

/// Operations a tag store needs from an entry.
///
/// The provided methods implement the base behaviour in terms of the required
/// ones; entry kinds that refine tag or validity storage override only what
/// they change and keep `matches ⇔ valid ∧ tag-equality`.
pub trait TaggedEntry: fmt::Display {
    /// Returns `true` if the entry holds meaningful content.
    fn is_valid(&self) -> bool;

    /// Returns the stored tag.
    ///
    /// Only meaningful while [`is_valid`](Self::is_valid) holds; an invalid
    /// entry reports [`MAX_ADDR`].
    fn tag(&self) -> Addr;

    /// Applies this entry's tag extractor to `addr`.
    fn extract_tag(&self, addr: Addr) -> Addr;

    /// Fills the entry with the content identified by `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::AlreadyValid`] if the entry is valid. The entry is
    /// left untouched in that case.
    fn try_insert(&mut self, addr: Addr) -> Result<(), EntryError>;

    /// Drops the content of the entry and resets the tag to [`MAX_ADDR`].
    fn invalidate(&mut self);

    /// Replacement bookkeeping of this entry.
    fn replaceable(&self) -> &ReplaceableEntry;

    /// Mutable replacement bookkeeping of this entry.
    fn replaceable_mut(&mut self) -> &mut ReplaceableEntry;

    /// Returns `true` if the entry is valid and holds the tag of `addr`.
    ///
    /// The tag of `addr` is extracted on every call.
    #[inline]
    fn matches(&self, addr: Addr) -> bool {
        self.is_valid() && self.tag() == self.extract_tag(addr)
    }

    /// Fills the entry with the content identified by `addr`.
    ///
    /// # Panics
    ///
    /// Panics if the entry is already valid. Callers must invalidate a victim
    /// before refilling it.
    #[track_caller]
    fn insert(&mut self, addr: Addr) {
        if let Err(err) = self.try_insert(addr) {
            fatal(&err);
        }
    }
}

/// Logs a precondition violation and aborts the current operation.
#[cold]
#[track_caller]
pub(crate) fn fatal(err: &EntryError) -> ! {
    tracing::error!(error = %err, "entry precondition violated");
    panic!("{err}");
}

/// The base tagged entry: one valid bit and one tag.
#[derive(Clone)]
pub struct CacheEntry {
    extractor: SharedTagExtractor,
    valid: bool,
    tag: Addr,
    repl: ReplaceableEntry,
}

impl CacheEntry {
    /// Creates an invalid entry bound to `extractor`.
    ///
    /// # Arguments
    ///
    /// * `extractor` - Shared tag extractor, usually the same handle the
    ///   owning structure's indexing policy uses.
    pub fn new(extractor: SharedTagExtractor) -> Self {
        Self {
            extractor,
            valid: false,
            tag: MAX_ADDR,
            repl: ReplaceableEntry::new(),
        }
    }

    /// Returns the shared extractor this entry was built with.
    pub const fn extractor(&self) -> &SharedTagExtractor {
        &self.extractor
    }
}

impl TaggedEntry for CacheEntry {
    #[inline(always)]
    fn is_valid(&self) -> bool {
        self.valid
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
        if self.valid {
            return Err(EntryError::AlreadyValid {
                addr,
                tag: self.tag,
                entry: self.to_string(),
            });
        }
        self.valid = true;
        self.tag = self.extractor.extract_tag(addr);
        tracing::trace!(addr, tag = self.tag, "entry inserted");
        Ok(())
    }

    fn invalidate(&mut self) {
        if self.valid {
            tracing::trace!(tag = self.tag, "entry invalidated");
        }
        self.valid = false;
        self.tag = MAX_ADDR;
    }

    fn replaceable(&self) -> &ReplaceableEntry {
        &self.repl
    }

    fn replaceable_mut(&mut self) -> &mut ReplaceableEntry {
        &mut self.repl
    }
}

impl fmt::Display for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tag: {:#x} valid: {} | {}",
            self.tag,
            u8::from(self.valid),
            self.repl
        )
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("valid", &self.valid)
            .field("tag", &format_args!("{:#x}", self.tag))
            .field("repl", &self.repl)
            .finish_non_exhaustive()
    }
}
