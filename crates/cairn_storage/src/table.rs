//! Per-kind component tables.
//!
//! A table maps thing ids to component values. Indexed kinds also keep a
//! [`ValueIndex`]; track-new kinds keep a new-list of ids that acquired the
//! kind since the list was last cleared.

use std::collections::HashSet;

use cairn_foundation::ThingId;
use im::OrdMap;

use crate::component::Component;
use crate::index::ValueIndex;

/// Sparse storage for one component kind.
#[derive(Clone, Debug)]
pub struct Table<T: Component> {
    entries: OrdMap<ThingId, T>,
    index: Option<ValueIndex<T>>,
    fresh: Option<Vec<ThingId>>,
}

impl<T: Component> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> Table<T> {
    /// Creates an empty table shaped by `T`'s registry flags.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: OrdMap::new(),
            index: T::INDEXED.then(ValueIndex::new),
            fresh: T::TRACK_NEW.then(Vec::new),
        }
    }

    /// Gets the value held by `id`.
    #[must_use]
    pub fn get(&self, id: ThingId) -> Option<&T> {
        self.entries.get(&id)
    }

    /// Checks if `id` holds this kind.
    #[must_use]
    pub fn contains(&self, id: ThingId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of holders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing holds this kind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates holders in id order.
    pub fn ids(&self) -> impl Iterator<Item = ThingId> + '_ {
        self.entries.keys().copied()
    }

    /// Iterates `(id, value)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ThingId, &T)> + '_ {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    /// Holders of exactly `value`, in insertion order.
    ///
    /// Always empty for kinds without an index.
    #[must_use]
    pub fn holders_of(&self, value: &T) -> &[ThingId] {
        self.index.as_ref().map_or(&[], |index| index.get(value))
    }

    /// Ids that acquired this kind since the last clear.
    ///
    /// Always empty for kinds without a new-list.
    #[must_use]
    pub fn fresh(&self) -> &[ThingId] {
        self.fresh.as_deref().unwrap_or(&[])
    }

    /// Stores `value` for `id`, returning the value it replaced.
    ///
    /// The id is appended to the bucket for `value` and to the new-list
    /// unconditionally. A replaced value's bucket keeps its entry; callers
    /// that move a thing between values remove it first.
    pub(crate) fn insert(&mut self, id: ThingId, value: T) -> Option<T> {
        if let Some(index) = &mut self.index {
            index.insert(&value, id);
        }
        if let Some(fresh) = &mut self.fresh {
            fresh.push(id);
        }
        self.entries.insert(id, value)
    }

    /// Removes the value held by `id`, dropping one index occurrence.
    pub(crate) fn remove(&mut self, id: ThingId) -> Option<T> {
        let value = self.entries.remove(&id)?;
        if let Some(index) = &mut self.index {
            index.remove(&value, id);
        }
        Some(value)
    }

    /// Empties the new-list without touching stored values.
    pub(crate) fn clear_fresh(&mut self) {
        if let Some(fresh) = &mut self.fresh {
            fresh.clear();
        }
    }

    /// Stores a loaded value: indexed like [`insert`](Self::insert) but
    /// not recorded as new.
    pub(crate) fn restore(&mut self, id: ThingId, value: T) {
        if let Some(index) = &mut self.index {
            index.insert(&value, id);
        }
        self.entries.insert(id, value);
    }

    /// Replaces the new-list wholesale. Ignored for kinds without one.
    pub(crate) fn restore_fresh(&mut self, ids: Vec<ThingId>) {
        if let Some(fresh) = &mut self.fresh {
            *fresh = ids;
        }
    }

    /// Entries in the order that rebuilds the index's bucket order on load.
    ///
    /// For indexed kinds each bucket is emitted contiguously in insertion
    /// order, at the position of its lowest holder. Stale bucket entries
    /// (ids that moved to another value without a remove) are skipped, so a
    /// reload yields an index that matches the table exactly.
    pub(crate) fn save_order(&self) -> Vec<(ThingId, &T)> {
        let Some(index) = &self.index else {
            return self.iter().collect();
        };
        let mut emitted = HashSet::with_capacity(self.entries.len());
        let mut order = Vec::with_capacity(self.entries.len());
        for (id, value) in self.iter() {
            if emitted.contains(&id) {
                continue;
            }
            for holder in index.get(value) {
                if self.entries.get(holder) == Some(value) && emitted.insert(*holder) {
                    order.push((*holder, value));
                }
            }
            if emitted.insert(id) {
                order.push((id, value));
            }
        }
        order
    }
}
