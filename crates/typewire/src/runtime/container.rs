// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Set and map values.
//!
//! `Default` and `Sorted` containers keep their items (keys) in value order,
//! which doubles as the canonical layout used for equality and hashing.
//! `Ordered` containers keep insertion order and compare order-sensitively.
//! A container of one kind never equals one of the other kind.
//!
//! Bulk construction (`from_items`, `from_entries`, `extend`) sorts once for
//! value-ordered containers; insertion-ordered ones keep a position index,
//! so building from decoded input stays `O(n log n)`.

use super::hash::hash_of;
use super::Value;
use crate::descriptor::ContainerOrdering;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Position of each item (key) of an insertion-ordered container.
///
/// Left empty for value-ordered containers.
type PositionIndex = HashMap<Value, usize>;

/// Re-point index entries after a removal shifted `moved` down to `from`.
fn reindex<'a>(index: &mut PositionIndex, from: usize, moved: impl Iterator<Item = &'a Value>) {
    for (offset, item) in moved.enumerate() {
        if let Some(pos) = index.get_mut(item) {
            *pos = from + offset;
        }
    }
}

fn is_insertion_ordered(ordering: ContainerOrdering) -> bool {
    ordering == ContainerOrdering::Ordered
}

/// Compare two containers: content hash first, then item by item.
///
/// This is a total order consistent with equality, but not a meaningful
/// content order.
pub(crate) fn compare_by_hash<'a, T, A, B>(a: &T, b: &T, items_a: A, items_b: B) -> Ordering
where
    T: Hash + ?Sized,
    A: Iterator<Item = &'a Value>,
    B: Iterator<Item = &'a Value>,
{
    hash_of(a)
        .cmp(&hash_of(b))
        .then_with(|| items_a.cmp(items_b))
}

/// A set of unique values.
#[derive(Clone, Default)]
pub struct SetValue {
    ordering: ContainerOrdering,
    items: Vec<Value>,
    index: PositionIndex,
}

impl SetValue {
    pub fn new(ordering: ContainerOrdering) -> Self {
        Self {
            ordering,
            items: Vec::new(),
            index: PositionIndex::new(),
        }
    }

    pub fn from_items(ordering: ContainerOrdering, items: impl IntoIterator<Item = Value>) -> Self {
        let mut set = Self::new(ordering);
        set.extend(items);
        set
    }

    pub fn ordering(&self) -> ContainerOrdering {
        self.ordering
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn contains(&self, item: &Value) -> bool {
        self.position(item).is_some()
    }

    /// Insert an item; false if it was already present.
    pub fn insert(&mut self, item: Value) -> bool {
        if is_insertion_ordered(self.ordering) {
            if self.index.contains_key(&item) {
                return false;
            }
            self.index.insert(item.clone(), self.items.len());
            self.items.push(item);
            return true;
        }
        match self.items.binary_search(&item) {
            Ok(_) => false,
            Err(pos) => {
                self.items.insert(pos, item);
                true
            }
        }
    }

    pub fn remove(&mut self, item: &Value) -> bool {
        let Some(pos) = self.position(item) else {
            return false;
        };
        self.items.remove(pos);
        if is_insertion_ordered(self.ordering) {
            self.index.remove(item);
            reindex(&mut self.index, pos, self.items[pos..].iter());
        }
        true
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    /// Same items under another ordering.
    pub fn with_ordering(self, ordering: ContainerOrdering) -> Self {
        if ordering == self.ordering {
            return self;
        }
        Self::from_items(ordering, self.items)
    }

    fn position(&self, item: &Value) -> Option<usize> {
        if is_insertion_ordered(self.ordering) {
            self.index.get(item).copied()
        } else {
            self.items.binary_search(item).ok()
        }
    }
}

impl Extend<Value> for SetValue {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, iter: I) {
        if is_insertion_ordered(self.ordering) {
            for item in iter {
                self.insert(item);
            }
            return;
        }
        let before = self.items.len();
        self.items.extend(iter);
        if self.items.len() != before {
            self.items.sort();
            self.items.dedup();
        }
    }
}

impl<'a> IntoIterator for &'a SetValue {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Debug for SetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetValue")
            .field("ordering", &self.ordering)
            .field("items", &self.items)
            .finish()
    }
}

impl PartialEq for SetValue {
    fn eq(&self, other: &Self) -> bool {
        is_insertion_ordered(self.ordering) == is_insertion_ordered(other.ordering)
            && self.items == other.items
    }
}

impl Eq for SetValue {}

impl Hash for SetValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        is_insertion_ordered(self.ordering).hash(state);
        self.items.hash(state);
    }
}

impl PartialOrd for SetValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SetValue {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_by_hash(self, other, self.items.iter(), other.items.iter())
            .then_with(|| is_insertion_ordered(self.ordering).cmp(&is_insertion_ordered(other.ordering)))
    }
}

/// A map with unique keys.
#[derive(Clone, Default)]
pub struct MapValue {
    ordering: ContainerOrdering,
    entries: Vec<(Value, Value)>,
    index: PositionIndex,
}

impl MapValue {
    pub fn new(ordering: ContainerOrdering) -> Self {
        Self {
            ordering,
            entries: Vec::new(),
            index: PositionIndex::new(),
        }
    }

    pub fn from_entries(
        ordering: ContainerOrdering,
        entries: impl IntoIterator<Item = (Value, Value)>,
    ) -> Self {
        let mut map = Self::new(ordering);
        map.extend(entries);
        map
    }

    pub fn ordering(&self) -> ContainerOrdering {
        self.ordering
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.position(key).map(|pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.position(key).is_some()
    }

    /// Insert or replace an entry, returning the replaced value.
    ///
    /// Replacing keeps the key's original position in an `Ordered` map.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        if is_insertion_ordered(self.ordering) {
            if let Some(&pos) = self.index.get(&key) {
                return Some(std::mem::replace(&mut self.entries[pos].1, value));
            }
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
            return None;
        }
        match self.entries.binary_search_by(|(existing, _)| existing.cmp(&key)) {
            Ok(pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            Err(pos) => {
                self.entries.insert(pos, (key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let pos = self.position(key)?;
        let (_, value) = self.entries.remove(pos);
        if is_insertion_ordered(self.ordering) {
            self.index.remove(key);
            reindex(
                &mut self.index,
                pos,
                self.entries[pos..].iter().map(|(key, _)| key),
            );
        }
        Some(value)
    }

    pub fn into_entries(self) -> Vec<(Value, Value)> {
        self.entries
    }

    /// Same entries under another ordering.
    pub fn with_ordering(self, ordering: ContainerOrdering) -> Self {
        if ordering == self.ordering {
            return self;
        }
        Self::from_entries(ordering, self.entries)
    }

    fn position(&self, key: &Value) -> Option<usize> {
        if is_insertion_ordered(self.ordering) {
            self.index.get(key).copied()
        } else {
            self.entries
                .binary_search_by(|(existing, _)| existing.cmp(key))
                .ok()
        }
    }
}

impl Extend<(Value, Value)> for MapValue {
    /// Later entries replace earlier ones with the same key.
    fn extend<I: IntoIterator<Item = (Value, Value)>>(&mut self, iter: I) {
        if is_insertion_ordered(self.ordering) {
            for (key, value) in iter {
                self.insert(key, value);
            }
            return;
        }
        let before = self.entries.len();
        self.entries.extend(iter);
        if self.entries.len() != before {
            // Stable, so equal keys keep arrival order and the last one wins.
            self.entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            self.entries.dedup_by(|later, kept| {
                if later.0 == kept.0 {
                    std::mem::swap(&mut later.1, &mut kept.1);
                    true
                } else {
                    false
                }
            });
        }
    }
}

impl fmt::Debug for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapValue")
            .field("ordering", &self.ordering)
            .field("entries", &self.entries)
            .finish()
    }
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        is_insertion_ordered(self.ordering) == is_insertion_ordered(other.ordering)
            && self.entries == other.entries
    }
}

impl Eq for MapValue {}

impl Hash for MapValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        is_insertion_ordered(self.ordering).hash(state);
        self.entries.hash(state);
    }
}

impl PartialOrd for MapValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MapValue {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_by_hash(
            self,
            other,
            self.entries.iter().flat_map(|(k, v)| [k, v]),
            other.entries.iter().flat_map(|(k, v)| [k, v]),
        )
        .then_with(|| is_insertion_ordered(self.ordering).cmp(&is_insertion_ordered(other.ordering)))
    }
}
