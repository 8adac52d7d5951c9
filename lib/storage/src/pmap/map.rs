use crate::pmap::iter::{Entries, Iter};
use crate::pmap::node::{Branch, Removal};
use rustc_hash::FxBuildHasher;
use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

/// A persistent hash map.
///
/// Every update returns a new [PMap] and leaves `self` untouched. The new version shares all
/// subtrees that are not on the path to the updated key with the old one, so an update allocates
/// `O(log n)` nodes. Cloning a map only bumps a reference count.
pub struct PMap<K, V> {
    root: Option<Arc<Branch<K, V>>>,
    len: usize,
}

impl<K, V> Clone for PMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
        }
    }
}

impl<K, V> Default for PMap<K, V> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

fn hash_of<K: Hash>(key: &K) -> u64 {
    FxBuildHasher.hash_one(key)
}

impl<K: Eq + Hash + Clone, V: Clone> PMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the value bound to `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.root.as_ref()?.get(0, hash_of(key), key)
    }

    /// Returns true if `key` is bound.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns a new version of the map in which `key` is bound to `value`.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let hash = hash_of(&key);
        let (root, added) = match &self.root {
            Some(root) => root.insert(0, hash, key, value),
            None => Branch::empty().insert(0, hash, key, value),
        };
        Self {
            root: Some(Arc::new(root)),
            len: if added { self.len + 1 } else { self.len },
        }
    }

    /// Returns a new version of the map without `key`.
    ///
    /// If `key` is not bound, the returned map shares its root with `self`.
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        let Some(root) = &self.root else {
            return Self::default();
        };

        match root.remove(0, hash_of(key), key) {
            Removal::Absent => self.clone(),
            Removal::Empty => Self::default(),
            Removal::Branch(root) => Self {
                root: Some(Arc::new(root)),
                len: self.len - 1,
            },
            // The root never collapses into a single entry.
            Removal::Single(_) => self.clone(),
        }
    }

    /// Returns a borrowing iterator over all entries.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Returns an iterator over all keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an owning iterator over all entries of this version of the map.
    pub fn entries(&self) -> Entries<K, V> {
        Entries::new(self.root.clone(), self.len)
    }

    /// Returns true if both maps are the same version, i.e., they share their root.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(lhs), Some(rhs)) => Arc::ptr_eq(lhs, rhs),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> FromIterator<(K, V)> for PMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, value)| map.insert(key, value))
    }
}

impl<'map, K: Eq + Hash + Clone, V: Clone> IntoIterator for &'map PMap<K, V> {
    type Item = (&'map K, &'map V);
    type IntoIter = Iter<'map, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Eq + Hash + Clone + Debug, V: Clone + Debug> Debug for PMap<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
