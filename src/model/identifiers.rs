//! Core identifier newtypes.

use std::fmt;

/// Identity of a message record inside a [`MessageStore`](crate::store::MessageStore).
///
/// Assigned by the store on insertion, strictly increasing per store.
/// A replaced record receives a fresh id, so anything keyed by identity
/// (layouts, paint buffers) is naturally invalidated by replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    /// Sentinel for records that have not been inserted into a store yet.
    pub const UNASSIGNED: Self = Self(0);

    /// First id handed out by a fresh store.
    pub(crate) const FIRST: Self = Self(1);

    /// Create an id from a raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Whether this id was assigned by a store.
    pub fn is_assigned(&self) -> bool {
        *self != Self::UNASSIGNED
    }

    /// The id following this one.
    pub(crate) fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
