//! Specialized collection types

use std::collections::btree_map::{BTreeMap, Entry};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

pub use slotmap::{new_key_type, SlotMap};

/// Insert `value` under `key`, panicking if the key is already present
///
/// Used where a duplicate key means two views of the same document have
/// drifted apart.
pub fn insert_or_fail<K: Ord + Debug, V>(map: &mut BTreeMap<K, V>, key: K, value: V) -> &mut V {
    match map.entry(key) {
        Entry::Vacant(entry) => entry.insert(value),
        Entry::Occupied(entry) => panic!("duplicate key {:?}", entry.key()),
    }
}

/// Insertion-ordered set
///
/// Keeps the first-insertion order of its items while rejecting duplicates.
#[derive(Debug, Clone)]
pub struct OrderedSet<T> {
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T: Copy + Eq + Hash> OrderedSet<T> {
    /// Create a new empty set
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Insert an item, returning `false` if it was already present
    pub fn insert(&mut self, item: T) -> bool {
        if self.seen.insert(item) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    /// Check whether an item is present
    pub fn contains(&self, item: &T) -> bool {
        self.seen.contains(item)
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consume the set, returning items in insertion order
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Copy + Eq + Hash> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Eq + Hash> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}
