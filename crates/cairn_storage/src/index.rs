//! Reverse lookup from component value to holders.
//!
//! Buckets keep insertion order, which callers rely on for stacking order
//! at a position. Removal takes out one occurrence of an id per call.

use std::collections::HashMap;
use std::hash::Hash;

use cairn_foundation::ThingId;

/// Maps each component value to the ids holding it.
#[derive(Clone, Debug)]
pub struct ValueIndex<T> {
    buckets: HashMap<T, Vec<ThingId>>,
}

impl<T> Default for ValueIndex<T> {
    fn default() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> ValueIndex<T> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` to the bucket for `value`.
    pub fn insert(&mut self, value: &T, id: ThingId) {
        if let Some(bucket) = self.buckets.get_mut(value) {
            bucket.push(id);
        } else {
            self.buckets.insert(value.clone(), vec![id]);
        }
    }

    /// Removes the first occurrence of `id` from the bucket for `value`.
    ///
    /// Returns false if the bucket does not contain `id`. Empty buckets are
    /// dropped.
    pub fn remove(&mut self, value: &T, id: ThingId) -> bool {
        let Some(bucket) = self.buckets.get_mut(value) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(|held| *held == id) else {
            return false;
        };
        bucket.remove(pos);
        if bucket.is_empty() {
            self.buckets.remove(value);
        }
        true
    }

    /// Ids holding `value`, in insertion order.
    #[must_use]
    pub fn get(&self, value: &T) -> &[ThingId] {
        self.buckets.get(value).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct values with at least one holder.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if no value has a holder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Drops every bucket.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}
