//! Identity types for synctrack.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one logical item being synced.
///
/// Assigned by the sync engine, not by the tracker. It stays the same for
/// the life of the item even when the item's path changes, which is how
/// the tracker recognises a rename.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Create a new ItemId with the given value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the numeric value of this ItemId.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}
