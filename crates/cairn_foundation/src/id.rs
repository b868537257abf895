//! Thing identifiers and the reserved id ranges.
//!
//! The id space is split into three disjoint, ordered bands:
//!
//! ```text
//! [1, TERRAIN_MAX_ID)              terrain prototypes (wall, floor, ...)
//! [TERRAIN_MAX_ID, SPECIAL_MAX_ID) special singletons (tile-effect agent, ...)
//! [SPECIAL_MAX_ID, ..)             ordinary things, allocated monotonically
//! ```
//!
//! Terrain and special things are re-registered on every startup and are
//! never persisted. Ordinary ids are never reused.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// First id past the terrain prototype band.
pub const TERRAIN_MAX_ID: u64 = 64;

/// First id past the special singleton band; the first ordinary id.
pub const SPECIAL_MAX_ID: u64 = 100;

const _: () = assert!(1 < TERRAIN_MAX_ID && TERRAIN_MAX_ID < SPECIAL_MAX_ID);

/// Identifier of a thing in a store.
///
/// Ids are plain integers; holders of an id must re-resolve it through the
/// store rather than keep references into it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ThingId(pub u64);

impl ThingId {
    /// The first ordinary id handed out by a fresh allocator.
    pub const FIRST_ORDINARY: ThingId = ThingId(SPECIAL_MAX_ID);

    /// Returns the raw integer.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Classifies this id, or `None` for the unused id 0.
    #[must_use]
    pub const fn range(self) -> Option<IdRange> {
        match self.0 {
            0 => None,
            id if id < TERRAIN_MAX_ID => Some(IdRange::Terrain),
            id if id < SPECIAL_MAX_ID => Some(IdRange::Special),
            _ => Some(IdRange::Ordinary),
        }
    }

    /// Returns true for terrain and special ids.
    ///
    /// Built-in things are recreated at startup and never saved or destroyed.
    #[must_use]
    pub const fn is_builtin(self) -> bool {
        self.0 < SPECIAL_MAX_ID
    }

    /// Returns true for ids in the ordinary band.
    #[must_use]
    pub const fn is_ordinary(self) -> bool {
        self.0 >= SPECIAL_MAX_ID
    }
}

impl fmt::Debug for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ThingId({})", self.0)
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the three id bands.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IdRange {
    /// `[1, TERRAIN_MAX_ID)`
    Terrain,
    /// `[TERRAIN_MAX_ID, SPECIAL_MAX_ID)`
    Special,
    /// `[SPECIAL_MAX_ID, ..)`
    Ordinary,
}

impl IdRange {
    /// Returns true if `id` falls inside this band.
    #[must_use]
    pub const fn contains(self, id: ThingId) -> bool {
        matches!(
            (self, id.range()),
            (IdRange::Terrain, Some(IdRange::Terrain))
                | (IdRange::Special, Some(IdRange::Special))
                | (IdRange::Ordinary, Some(IdRange::Ordinary))
        )
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terrain => write!(f, "terrain [1, {TERRAIN_MAX_ID})"),
            Self::Special => write!(f, "special [{TERRAIN_MAX_ID}, {SPECIAL_MAX_ID})"),
            Self::Ordinary => write!(f, "ordinary [{SPECIAL_MAX_ID}, ..)"),
        }
    }
}

/// Allocates monotonically increasing ordinary ids.
///
/// Destroyed ids are never handed out again, so there is no free list.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Creates an allocator seeded at [`SPECIAL_MAX_ID`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: SPECIAL_MAX_ID,
        }
    }

    /// Restores an allocator from a saved counter.
    ///
    /// Returns `None` if the counter would hand out a reserved id.
    #[must_use]
    pub const fn resume(next: ThingId) -> Option<Self> {
        if next.is_ordinary() {
            Some(Self { next: next.0 })
        } else {
            None
        }
    }

    /// Allocates a fresh id.
    ///
    /// Returns `None` once the id space is used up. `u64::MAX` is never
    /// handed out, so the counter cannot wrap back into the reserved bands.
    pub fn allocate(&mut self) -> Option<ThingId> {
        let next = self.next.checked_add(1)?;
        let id = ThingId(self.next);
        self.next = next;
        Some(id)
    }

    /// Returns true if no further id can be allocated.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.next == u64::MAX
    }

    /// The id the next call to [`allocate`](Self::allocate) will return.
    #[must_use]
    pub const fn peek(&self) -> ThingId {
        ThingId(self.next)
    }

    /// Returns true if `id` has been handed out by this allocator.
    #[must_use]
    pub const fn has_issued(&self, id: ThingId) -> bool {
        id.is_ordinary() && id.0 < self.next
    }
}
