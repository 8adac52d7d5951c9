use crate::pmap::{PMap, PSet};
use crate::term::StoreTerm;
use std::iter;
use std::sync::Arc;

/// A lazy sequence of tuples in the internal order of a table.
pub(crate) type TupleScan<T> = Box<dyn Iterator<Item = Vec<T>> + Send>;

/// A lazy sequence of terms.
pub(crate) type TermScan<T> = Box<dyn Iterator<Item = T> + Send>;

/// One level of a nested persistent map. The terms of a tuple are consumed one per level, in the
/// internal order of the table.
///
/// All operations are pure. Updates return a new level that shares every untouched child with
/// `self`. A level never holds an empty child.
pub(crate) trait TrieLevel<T: StoreTerm>: Clone + Default + Send + Sync + 'static {
    /// Returns true if the level holds no tuple.
    fn is_empty(&self) -> bool;

    /// Returns the number of tuples below this level.
    fn count(&self) -> usize;

    /// Returns a level that contains `terms`.
    #[must_use]
    fn insert(&self, terms: &[T]) -> Self;

    /// Returns a level without `terms`, or `None` if `terms` is not part of this level.
    fn remove(&self, terms: &[T]) -> Option<Self>;

    /// Returns true if `terms` is part of this level.
    fn contains(&self, terms: &[T]) -> bool;

    /// Scans all tuples that match `pattern` from `depth` onwards. `prefix` holds the terms chosen
    /// on the levels above.
    fn scan(&self, pattern: Arc<[Option<T>]>, depth: usize, prefix: Vec<T>) -> TupleScan<T>;

    /// Enumerates the distinct terms of this level without descending.
    fn keys(&self) -> TermScan<T>;
}

/// An inner level that maps each term to the next level.
pub(crate) struct TrieNode<T, C> {
    children: PMap<T, C>,
}

/// The last level, a set of terms.
pub(crate) struct TrieLeaf<T> {
    terms: PSet<T>,
}

impl<T, C> Clone for TrieNode<T, C> {
    fn clone(&self) -> Self {
        Self {
            children: self.children.clone(),
        }
    }
}

impl<T, C> Default for TrieNode<T, C> {
    fn default() -> Self {
        Self {
            children: PMap::default(),
        }
    }
}

impl<T> Clone for TrieLeaf<T> {
    fn clone(&self) -> Self {
        Self {
            terms: self.terms.clone(),
        }
    }
}

impl<T> Default for TrieLeaf<T> {
    fn default() -> Self {
        Self {
            terms: PSet::default(),
        }
    }
}

fn bound_at<T: StoreTerm>(pattern: &[Option<T>], depth: usize) -> Option<T> {
    pattern.get(depth).cloned().flatten()
}

impl<T: StoreTerm, C: TrieLevel<T>> TrieLevel<T> for TrieNode<T, C> {
    fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn count(&self) -> usize {
        self.children.iter().map(|(_, child)| child.count()).sum()
    }

    fn insert(&self, terms: &[T]) -> Self {
        let Some((first, rest)) = terms.split_first() else {
            return self.clone();
        };

        let child = match self.children.get(first) {
            Some(child) => child.insert(rest),
            None => C::default().insert(rest),
        };
        Self {
            children: self.children.insert(first.clone(), child),
        }
    }

    fn remove(&self, terms: &[T]) -> Option<Self> {
        let (first, rest) = terms.split_first()?;
        let child = self.children.get(first)?.remove(rest)?;

        let children = if child.is_empty() {
            self.children.remove(first)
        } else {
            self.children.insert(first.clone(), child)
        };
        Some(Self { children })
    }

    fn contains(&self, terms: &[T]) -> bool {
        let Some((first, rest)) = terms.split_first() else {
            return false;
        };
        self.children
            .get(first)
            .is_some_and(|child| child.contains(rest))
    }

    fn scan(&self, pattern: Arc<[Option<T>]>, depth: usize, mut prefix: Vec<T>) -> TupleScan<T> {
        if let Some(term) = bound_at(&pattern, depth) {
            return match self.children.get(&term) {
                Some(child) => {
                    prefix.push(term);
                    child.scan(pattern, depth + 1, prefix)
                }
                None => Box::new(iter::empty()),
            };
        }

        Box::new(self.children.entries().flat_map(move |(term, child)| {
            let mut prefix = prefix.clone();
            prefix.push(term);
            child.scan(Arc::clone(&pattern), depth + 1, prefix)
        }))
    }

    fn keys(&self) -> TermScan<T> {
        Box::new(self.children.entries().map(|(term, _)| term))
    }
}

impl<T: StoreTerm> TrieLevel<T> for TrieLeaf<T> {
    fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn count(&self) -> usize {
        self.terms.len()
    }

    fn insert(&self, terms: &[T]) -> Self {
        match terms.first() {
            Some(term) => Self {
                terms: self.terms.insert(term.clone()),
            },
            None => self.clone(),
        }
    }

    fn remove(&self, terms: &[T]) -> Option<Self> {
        let term = terms.first()?;
        self.terms.contains(term).then(|| Self {
            terms: self.terms.remove(term),
        })
    }

    fn contains(&self, terms: &[T]) -> bool {
        terms.first().is_some_and(|term| self.terms.contains(term))
    }

    fn scan(&self, pattern: Arc<[Option<T>]>, depth: usize, mut prefix: Vec<T>) -> TupleScan<T> {
        if let Some(term) = bound_at(&pattern, depth) {
            if !self.terms.contains(&term) {
                return Box::new(iter::empty());
            }
            prefix.push(term);
            return Box::new(iter::once(prefix));
        }

        Box::new(self.terms.elements().map(move |term| {
            let mut tuple = prefix.clone();
            tuple.push(term);
            tuple
        }))
    }

    fn keys(&self) -> TermScan<T> {
        Box::new(self.terms.elements())
    }
}

/// The nested levels of a quad table.
pub(crate) type QuadTrie<T> = TrieNode<T, TrieNode<T, TrieNode<T, TrieLeaf<T>>>>;

/// The nested levels of a triple table.
pub(crate) type TripleTrie<T> = TrieNode<T, TrieNode<T, TrieLeaf<T>>>;
