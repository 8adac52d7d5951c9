use crate::tuple::{Quad, Triple};
use std::fmt::{Debug, Formatter};
use std::iter;

/// A lazy result of a dataset read.
///
/// The iterator owns the snapshot it reads from. It stays valid after the transaction that created
/// it has finished and never observes later commits.
pub struct DatasetIter<I> {
    inner: Box<dyn Iterator<Item = I> + Send>,
}

/// The quads that match a pattern.
pub type QuadIter<T> = DatasetIter<Quad<T>>;

/// The triples that match a pattern.
pub type TripleIter<T> = DatasetIter<Triple<T>>;

/// A sequence of terms, e.g., graph names.
pub type TermIter<T> = DatasetIter<T>;

impl<I> DatasetIter<I> {
    pub(crate) fn new(inner: impl Iterator<Item = I> + Send + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    pub(crate) fn empty() -> Self
    where
        I: Send + 'static,
    {
        Self::new(iter::empty())
    }
}

impl<I> Iterator for DatasetIter<I> {
    type Item = I;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I> Debug for DatasetIter<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetIter").finish_non_exhaustive()
    }
}
