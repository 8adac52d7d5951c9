use crate::dataset::{MemDataset, TripleIter};
use crate::error::StorageError;
use crate::term::StoreTerm;
use crate::tuple::Triple;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::iter;

/// A single graph of a [MemDataset].
///
/// Every operation runs in a transaction of its own. Use the graph operations of a
/// [DatasetTransaction](crate::DatasetTransaction) to combine several of them.
///
/// The operations of a view fail with [TransactionError::Nested](crate::TransactionError::Nested)
/// while the current thread holds a transaction on the dataset. Use the methods of that
/// transaction instead.
///
/// The view of the union graph is read-only. Writing to it fails with
/// [StorageError::ReadOnlyUnionGraph].
pub struct GraphView<'dataset, T: StoreTerm> {
    dataset: &'dataset MemDataset<T>,
    name: T,
}

impl<'dataset, T: StoreTerm> GraphView<'dataset, T> {
    pub(super) fn new(dataset: &'dataset MemDataset<T>, name: T) -> Self {
        Self { dataset, name }
    }

    pub fn name(&self) -> &T {
        &self.name
    }

    pub fn is_union_graph(&self) -> bool {
        self.name.is_union_graph()
    }

    pub fn find(
        &self,
        subject: Option<&T>,
        predicate: Option<&T>,
        object: Option<&T>,
    ) -> Result<TripleIter<T>, StorageError> {
        self.dataset.execute_read(|transaction| {
            transaction.find_in_graph(&self.name, subject, predicate, object)
        })
    }

    pub fn contains(&self, triple: &Triple<T>) -> Result<bool, StorageError> {
        let mut matches = self.find(
            Some(&triple.subject),
            Some(&triple.predicate),
            Some(&triple.object),
        )?;
        Ok(matches.next().is_some())
    }

    pub fn add(&self, triple: &Triple<T>) -> Result<(), StorageError> {
        let quad = triple.clone().in_graph(self.name.clone());
        self.dataset.add(&quad)
    }

    pub fn delete(&self, triple: &Triple<T>) -> Result<(), StorageError> {
        let quad = triple.clone().in_graph(self.name.clone());
        self.dataset.delete(&quad)
    }

    /// Returns the number of triples. Counts the distinct triples for the union graph.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.find(None, None, None)?.count())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.find(None, None, None)?.next().is_none())
    }

    /// Removes all triples. The prefixes of the graph are kept.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.dataset
            .execute_write(|transaction| transaction.add_graph(&self.name, iter::empty()))
    }

    pub fn prefixes(&self) -> BTreeMap<String, String> {
        self.dataset.prefixes().prefixes(&self.name)
    }

    pub fn namespace(&self, prefix: &str) -> Option<String> {
        self.dataset.prefixes().namespace(&self.name, prefix)
    }

    pub fn set_prefix(&self, prefix: &str, namespace: &str) {
        self.dataset
            .prefixes()
            .set_prefix(&self.name, prefix, namespace);
    }

    pub fn remove_prefix(&self, prefix: &str) {
        self.dataset.prefixes().remove_prefix(&self.name, prefix);
    }
}

impl<T: StoreTerm> Debug for GraphView<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphView")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
