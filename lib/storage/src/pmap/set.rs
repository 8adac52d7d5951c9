use crate::pmap::iter::Entries;
use crate::pmap::PMap;
use std::fmt::{Debug, Formatter};
use std::hash::Hash;

/// A persistent hash set, implemented as a [PMap] without values.
pub struct PSet<K> {
    map: PMap<K, ()>,
}

impl<K> Clone for PSet<K> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<K> Default for PSet<K> {
    fn default() -> Self {
        Self {
            map: PMap::default(),
        }
    }
}

impl<K: Eq + Hash + Clone> PSet<K> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the set has no elements.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns true if `element` is part of the set.
    pub fn contains(&self, element: &K) -> bool {
        self.map.contains_key(element)
    }

    /// Returns a new version of the set that contains `element`.
    #[must_use]
    pub fn insert(&self, element: K) -> Self {
        Self {
            map: self.map.insert(element, ()),
        }
    }

    /// Returns a new version of the set without `element`.
    #[must_use]
    pub fn remove(&self, element: &K) -> Self {
        Self {
            map: self.map.remove(element),
        }
    }

    /// Returns a borrowing iterator over the elements.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    /// Returns an owning iterator over the elements of this version of the set.
    pub fn elements(&self) -> Elements<K> {
        Elements {
            inner: self.map.entries(),
        }
    }
}

/// An owning iterator over the elements of a [PSet].
pub struct Elements<K> {
    inner: Entries<K, ()>,
}

impl<K: Clone> Iterator for Elements<K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for PSet<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        iter.into_iter().fold(Self::new(), |set, element| set.insert(element))
    }
}

impl<K: Eq + Hash + Clone + Debug> Debug for PSet<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
