//! Ordered map: O(1) lookup by key plus an explicitly maintained order.
//!
//! Display order never depends on hash iteration order, and two maps are
//! only equal when they hold the same entries in the same order.

use crate::error::{BoardError, Result};
use indexmap::{Equivalent, IndexMap};
use std::fmt::Display;
use std::hash::Hash;

/// Relocate one element of `items` from index `from` to index `to`,
/// shifting everything in between by one slot.
///
/// Returns false (and leaves `items` untouched) when either index is out
/// of range.
pub fn move_position<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}

#[derive(Debug, Clone)]
pub struct OrderedMap<K, V>
where
    K: Eq + Hash,
{
    entries: IndexMap<K, V>,
}

impl<K, V> Default for OrderedMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<K, V> PartialEq for OrderedMap<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a separately stored order and an entry map keyed by id.
    ///
    /// Fails unless the order lists every key of `entries` exactly once.
    pub fn from_parts(order: Vec<K>, mut entries: IndexMap<K, V>) -> Result<Self>
    where
        K: Display,
    {
        let mut ordered = IndexMap::with_capacity(entries.len());
        for key in order {
            if ordered.contains_key(&key) {
                return Err(BoardError::malformed(format!(
                    "'{}' appears more than once in the order",
                    key
                )));
            }
            let value = entries.swap_remove(&key).ok_or_else(|| {
                BoardError::malformed(format!("'{}' is ordered but has no entry", key))
            })?;
            ordered.insert(key, value);
        }
        if let Some(orphan) = entries.keys().next() {
            return Err(BoardError::malformed(format!(
                "'{}' has an entry but is missing from the order",
                orphan
            )));
        }
        Ok(Self { entries: ordered })
    }

    /// The underlying map, iterating in display order
    pub fn into_inner(self) -> IndexMap<K, V> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.entries.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.entries.get_mut(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Insert a value. New keys are appended to the order; existing keys
    /// keep their position and have their value replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// Remove an entry, closing the gap it leaves in the order
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.entries.shift_remove(key)
    }

    /// Index of `key` in display order
    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.entries.get_index_of(key)
    }

    /// Keys in display order
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> + DoubleEndedIterator {
        self.entries.keys()
    }

    /// Values in display order
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + DoubleEndedIterator {
        self.entries.values()
    }

    /// Key/value pairs in display order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> + DoubleEndedIterator {
        self.entries.iter()
    }

    /// Positional move within the order, with the same shifting as
    /// [`move_position`]. Returns false when either index is out of range.
    pub fn move_to(&mut self, from: usize, to: usize) -> bool {
        if from >= self.entries.len() || to >= self.entries.len() {
            return false;
        }
        self.entries.move_index(from, to);
        true
    }
}
