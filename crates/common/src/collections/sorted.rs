//! An ordered vector that keeps its items sorted by a caller-provided key and
//! never holds two items with the same identity.
//!
//! A [`SortedVec`] is the backing store for every entry collection in
//! Timetrail. Inserts locate their position with a binary search
//! ([`slice::partition_point`]) instead of re-sorting, so the ordering
//! invariant holds after any sequence of [`insert`](SortedVec::insert),
//! [`remove`](SortedVec::remove) and [`replace`](SortedVec::replace) calls.
//!
//! Items with equal keys keep their insertion order: a new item is placed
//! after every existing item with the same key.
//!
//! # Complexity
//! - `insert`: O(n) (O(log n) search + shift, plus an O(n) identity scan)
//! - `remove`, `replace`, `get`, `contains`: O(n)
//! - `len`, `is_empty`, `first`, `last`, `as_slice`: O(1)

use std::fmt;

/// Anything with a stable unique identifier.
///
/// Two values are the same item when their identities are equal, regardless
/// of where they live in memory. Values that round-trip through
/// serialization keep their identity.
pub trait Identified {
    /// Stable identifier, unique within one collection.
    fn identity(&self) -> &str;
}

/// Direction in which the sort key grows through the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest key first.
    #[default]
    Ascending,
    /// Largest key first.
    Descending,
}

/// Vector kept sorted by `key` in `direction`, deduplicated by identity.
#[derive(Clone)]
pub struct SortedVec<T, K = i64> {
    items: Vec<T>,
    key: fn(&T) -> K,
    direction: SortDirection,
}

impl<T, K> SortedVec<T, K>
where
    T: Identified,
    K: Ord,
{
    /// Create an empty collection ordered by `key` in `direction`.
    #[must_use]
    pub fn new(key: fn(&T) -> K, direction: SortDirection) -> Self {
        Self { items: Vec::new(), key, direction }
    }

    /// Build a collection from arbitrary items.
    ///
    /// Items are inserted one by one, so later duplicates of an identity
    /// already present are dropped.
    pub fn from_items<I>(items: I, key: fn(&T) -> K, direction: SortDirection) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut sorted = Self::new(key, direction);
        sorted.extend(items);
        sorted
    }

    /// Insert `item` at the position that preserves the ordering.
    ///
    /// Returns `false` and leaves the collection untouched when an item with
    /// the same identity is already present.
    pub fn insert(&mut self, item: T) -> bool {
        if self.contains(item.identity()) {
            return false;
        }
        let position = self.insert_position(&item);
        self.items.insert(position, item);
        true
    }

    /// Insert every item of `items`, skipping identities already present.
    ///
    /// Returns the number of items actually inserted.
    pub fn extend<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        items.into_iter().map(|item| self.insert(item)).filter(|inserted| *inserted).count()
    }

    /// Remove the item matching `item`.
    ///
    /// The lookup first checks whether `item` is itself a reference into this
    /// collection, then falls back to identity equality. At most one item is
    /// removed.
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let position = self.position_of(item)?;
        Some(self.items.remove(position))
    }

    /// Remove the item whose identity equals `id`.
    pub fn remove_by_id(&mut self, id: &str) -> Option<T> {
        let position = self.items.iter().position(|existing| existing.identity() == id)?;
        Some(self.items.remove(position))
    }

    /// Swap the item identified by `old_id` for `item` in one step.
    ///
    /// The old item (if any) is removed and `item` is inserted at its sorted
    /// position. Callers holding `&mut self` can never observe the state in
    /// between. Returns the replaced item, or `None` when `old_id` was absent
    /// (in which case `item` is still inserted unless its own identity is
    /// already taken).
    pub fn replace(&mut self, old_id: &str, item: T) -> Option<T> {
        let previous = self.remove_by_id(old_id);
        if self.contains(item.identity()) {
            // Identity collision with a different item: keep the collection
            // consistent by restoring the removed one.
            if let Some(previous) = previous {
                self.insert(previous);
            }
            return None;
        }
        self.insert(item);
        previous
    }

    /// Whether an item with identity `id` is present.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|existing| existing.identity() == id)
    }

    /// Borrow the item with identity `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|existing| existing.identity() == id)
    }

    /// Keep only the items for which `keep` returns `true`.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.items.retain(keep);
    }

    /// Whether the ordering invariant currently holds.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.items.windows(2).all(|pair| match self.direction {
            SortDirection::Ascending => (self.key)(&pair[0]) <= (self.key)(&pair[1]),
            SortDirection::Descending => (self.key)(&pair[0]) >= (self.key)(&pair[1]),
        })
    }

    fn insert_position(&self, item: &T) -> usize {
        let key = (self.key)(item);
        match self.direction {
            SortDirection::Ascending => self.items.partition_point(|existing| (self.key)(existing) <= key),
            SortDirection::Descending => self.items.partition_point(|existing| (self.key)(existing) >= key),
        }
    }

    fn position_of(&self, item: &T) -> Option<usize> {
        self.items
            .iter()
            .position(|existing| std::ptr::eq(existing, item))
            .or_else(|| self.items.iter().position(|existing| existing.identity() == item.identity()))
    }
}

impl<T, K> SortedVec<T, K> {
    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// First item in sort order.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Last item in sort order.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Items in sort order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate items in sort order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Configured direction.
    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Consume the collection, returning the items in sort order.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: fmt::Debug, K> fmt::Debug for SortedVec<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedVec")
            .field("direction", &self.direction)
            .field("items", &self.items)
            .finish()
    }
}

impl<'a, T, K> IntoIterator for &'a SortedVec<T, K> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize, K> serde::Serialize for SortedVec<T, K> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}
