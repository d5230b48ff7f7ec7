//! Replacement-policy bookkeeping.
//!
//! Every tagged entry embeds a [`ReplaceableEntry`]. It records where the
//! entry sits in its array and carries the recency markers a replacement
//! policy reads to choose a victim. The entry itself never interprets these
//! fields; only the policy does.

use std::fmt;

/// Position and recency markers of one entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplaceableEntry {
    set: u32,
    way: u32,
    last_touch: Option<u64>,
    inserted_at: Option<u64>,
}

impl ReplaceableEntry {
    /// Creates bookkeeping for an entry at set 0, way 0 with no history.
    pub const fn new() -> Self {
        Self {
            set: 0,
            way: 0,
            last_touch: None,
            inserted_at: None,
        }
    }

    /// Records where the owning array placed this entry.
    ///
    /// # Arguments
    ///
    /// * `set` - The set index.
    /// * `way` - The way index within the set.
    pub fn set_position(&mut self, set: u32, way: u32) {
        self.set = set;
        self.way = way;
    }

    /// Set index of this entry.
    pub const fn set(&self) -> u32 {
        self.set
    }

    /// Way index of this entry.
    pub const fn way(&self) -> u32 {
        self.way
    }

    /// Marks the entry as accessed at `tick`.
    pub fn touch(&mut self, tick: u64) {
        self.last_touch = Some(tick);
    }

    /// Tick of the most recent access, if any.
    pub const fn last_touch(&self) -> Option<u64> {
        self.last_touch
    }

    /// Marks the entry as filled at `tick`. Also counts as an access.
    pub fn mark_inserted(&mut self, tick: u64) {
        self.inserted_at = Some(tick);
        self.last_touch = Some(tick);
    }

    /// Tick at which the current contents were filled, if any.
    pub const fn inserted_at(&self) -> Option<u64> {
        self.inserted_at
    }

    /// Clears the recency markers. The position is kept.
    pub fn reset(&mut self) {
        self.last_touch = None;
        self.inserted_at = None;
    }
}

impl fmt::Display for ReplaceableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "set: {:#x} way: {:#x}", self.set, self.way)
    }
}
