//! Component presence bitmask.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One bit per registered component kind.
///
/// Bit `i` is set exactly when component table `i` holds a value for the
/// owning thing.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Systems(u64);

impl Systems {
    /// Number of component kinds a mask can describe.
    pub const CAPACITY: usize = u64::BITS as usize;

    /// The empty mask.
    pub const EMPTY: Systems = Systems(0);

    /// Builds a mask from its raw bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns true if bit `bit` is set.
    #[must_use]
    pub const fn contains(self, bit: usize) -> bool {
        bit < Self::CAPACITY && self.0 & (1 << bit) != 0
    }

    /// Sets bit `bit`.
    pub fn insert(&mut self, bit: usize) {
        debug_assert!(bit < Self::CAPACITY);
        self.0 |= 1 << bit;
    }

    /// Clears bit `bit`.
    pub fn remove(&mut self, bit: usize) {
        debug_assert!(bit < Self::CAPACITY);
        self.0 &= !(1 << bit);
    }

    /// Returns true if no bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of set bits.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the set bit positions in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..Self::CAPACITY).filter(move |bit| self.contains(*bit))
    }
}

impl fmt::Debug for Systems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Systems({:#b})", self.0)
    }
}

impl FromIterator<usize> for Systems {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut mask = Systems::EMPTY;
        for bit in iter {
            mask.insert(bit);
        }
        mask
    }
}
