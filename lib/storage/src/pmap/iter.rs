use crate::pmap::node::{Branch, Collision, Entry};
use std::sync::Arc;

/// A borrowing iterator over the entries of a [PMap](super::PMap).
pub struct Iter<'map, K, V> {
    stack: Vec<std::slice::Iter<'map, Entry<K, V>>>,
    collision: Option<std::slice::Iter<'map, (K, V)>>,
    remaining: usize,
}

impl<'map, K, V> Iter<'map, K, V> {
    pub(super) fn new(root: Option<&'map Branch<K, V>>, len: usize) -> Self {
        Self {
            stack: root.map(|root| root.entries().iter()).into_iter().collect(),
            collision: None,
            remaining: len,
        }
    }
}

impl<'map, K, V> Iterator for Iter<'map, K, V> {
    type Item = (&'map K, &'map V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(collision) = self.collision.as_mut() {
                match collision.next() {
                    Some((key, value)) => {
                        self.remaining -= 1;
                        return Some((key, value));
                    }
                    None => self.collision = None,
                }
            }

            let top = self.stack.last_mut()?;
            match top.next() {
                None => {
                    self.stack.pop();
                }
                Some(Entry::Leaf(leaf)) => {
                    self.remaining -= 1;
                    return Some((leaf.key(), leaf.value()));
                }
                Some(Entry::Collision(collision)) => {
                    self.collision = Some(collision.entries().iter());
                }
                Some(Entry::Branch(branch)) => self.stack.push(branch.entries().iter()),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// An owning iterator over the entries of a [PMap](super::PMap).
///
/// The iterator holds on to the version of the map it was created from. Later modifications of
/// the map produce new versions and are not observed. Iterating the same version twice yields the
/// same sequence.
pub struct Entries<K, V> {
    stack: Vec<(Arc<Branch<K, V>>, usize)>,
    collision: Option<(Arc<Collision<K, V>>, usize)>,
    remaining: usize,
}

impl<K, V> Entries<K, V> {
    pub(super) fn new(root: Option<Arc<Branch<K, V>>>, len: usize) -> Self {
        Self {
            stack: root.map(|root| (root, 0)).into_iter().collect(),
            collision: None,
            remaining: len,
        }
    }
}

impl<K: Clone, V: Clone> Iterator for Entries<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((collision, position)) = &mut self.collision {
                let entry = collision
                    .entries()
                    .get(*position)
                    .map(|(key, value)| (key.clone(), value.clone()));
                match entry {
                    Some(entry) => {
                        *position += 1;
                        self.remaining -= 1;
                        return Some(entry);
                    }
                    None => self.collision = None,
                }
            }

            let (branch, position) = self.stack.last_mut()?;
            let Some(entry) = branch.entries().get(*position).cloned() else {
                self.stack.pop();
                continue;
            };
            *position += 1;

            match entry {
                Entry::Leaf(leaf) => {
                    self.remaining -= 1;
                    return Some((leaf.key().clone(), leaf.value().clone()));
                }
                Entry::Collision(collision) => self.collision = Some((collision, 0)),
                Entry::Branch(branch) => self.stack.push((branch, 0)),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for Entries<K, V> {}
