mod graph;
mod iter;
mod options;
mod prefixes;
mod transaction;

pub use graph::GraphView;
pub use iter::{DatasetIter, QuadIter, TermIter, TripleIter};
pub use options::MemDatasetOptions;
pub use prefixes::{MemPrefixStorage, PrefixStorage};
pub use transaction::DatasetTransaction;

use crate::error::{StorageError, TransactionError};
use crate::index::{QuadIndexSet, TripleIndexSet};
use crate::term::StoreTerm;
use crate::tuple::{Quad, Triple};
use crate::txn::{TransactionGate, TxnType};
use dashmap::DashSet;
use parking_lot::FairMutex;
use rdf_mem_model::Node;
use rustc_hash::FxHasher;
use std::fmt::{Debug, Formatter};
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use transaction::TxnState;

/// A transactional in-memory RDF dataset.
///
/// The dataset consists of a default graph, any number of named graphs, and a read-only union
/// graph that holds the distinct triples of all named graphs. All access happens in a
/// [DatasetTransaction]. The methods directly on the dataset run in a transaction of their own
/// that commits right away.
///
/// These methods, and those of a [GraphView], fail with [TransactionError::Nested] while the
/// current thread holds a [DatasetTransaction] on this dataset. Use the methods of that
/// transaction instead.
///
/// Any number of transactions can read concurrently while a single transaction writes. A reader
/// observes the state of the dataset at the time it began, no matter what a writer commits in the
/// meantime.
pub struct MemDataset<T: StoreTerm = Node> {
    quads: QuadIndexSet<T>,
    triples: TripleIndexSet<T>,
    prefixes: Arc<dyn PrefixStorage<T>>,
    options: MemDatasetOptions,
    gate: TransactionGate,
    /// Guards the short critical sections that read or publish the table roots.
    system: FairMutex<()>,
    /// Incremented by every write commit.
    generation: AtomicU64,
    /// The threads with an open transaction on this dataset.
    active_threads: DashSet<ThreadId, BuildHasherDefault<FxHasher>>,
}

impl<T: StoreTerm> MemDataset<T> {
    /// Creates an empty dataset with the default options.
    pub fn new() -> Self {
        Self::with_options(MemDatasetOptions::default())
    }

    /// Creates an empty dataset.
    pub fn with_options(options: MemDatasetOptions) -> Self {
        Self {
            quads: QuadIndexSet::new(),
            triples: TripleIndexSet::new(),
            prefixes: Arc::new(MemPrefixStorage::new()),
            options,
            gate: TransactionGate::new(),
            system: FairMutex::new(()),
            generation: AtomicU64::new(0),
            active_threads: DashSet::default(),
        }
    }

    /// Replaces the storage of the prefix mappings.
    #[must_use]
    pub fn with_prefix_storage(mut self, prefixes: Arc<dyn PrefixStorage<T>>) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// Returns the options the dataset was created with.
    pub fn options(&self) -> MemDatasetOptions {
        self.options
    }

    /// Returns the prefix mappings of all graphs.
    ///
    /// Prefixes are not transactional. Only the removal of a graph drops its prefixes, and that
    /// happens when the removing transaction commits.
    pub fn prefixes(&self) -> &dyn PrefixStorage<T> {
        self.prefixes.as_ref()
    }

    /// Returns the number of committed write transactions.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Returns true if the current thread has an open transaction on this dataset.
    pub fn is_in_transaction(&self) -> bool {
        self.active_threads.contains(&thread::current().id())
    }

    /// Returns the number of transactions that currently read.
    pub fn active_readers(&self) -> usize {
        self.gate.active_readers()
    }

    /// Begins a transaction on the current thread.
    ///
    /// A [TxnType::Write] transaction waits until no other transaction writes. All other types
    /// start immediately.
    ///
    /// Fails with [TransactionError::Nested] if the current thread already has an open
    /// transaction on this dataset.
    pub fn begin(&self, txn_type: TxnType) -> Result<DatasetTransaction<'_, T>, TransactionError> {
        DatasetTransaction::begin(self, txn_type)
    }

    /// Takes a consistent snapshot of all table roots.
    fn start_state(&self) -> (TxnState<'_, T>, u64) {
        let _system = self.system.lock();
        let state = TxnState::new(self.quads.begin(), self.triples.begin());
        (state, self.generation.load(Ordering::Acquire))
    }

    /// Runs `action` in a read transaction.
    pub fn execute_read<R, E: From<StorageError>>(
        &self,
        action: impl FnOnce(&DatasetTransaction<'_, T>) -> Result<R, E>,
    ) -> Result<R, E> {
        let transaction = self
            .begin(TxnType::Read)
            .map_err(|error| E::from(StorageError::from(error)))?;
        let result = action(&transaction)?;
        transaction
            .end()
            .map_err(|error| E::from(StorageError::from(error)))?;
        Ok(result)
    }

    /// Runs `action` in a write transaction. The transaction commits if `action` succeeds and
    /// aborts otherwise.
    pub fn execute_write<R, E: From<StorageError>>(
        &self,
        action: impl FnOnce(&mut DatasetTransaction<'_, T>) -> Result<R, E>,
    ) -> Result<R, E> {
        let mut transaction = self
            .begin(TxnType::Write)
            .map_err(|error| E::from(StorageError::from(error)))?;
        match action(&mut transaction) {
            Ok(result) => {
                transaction.commit()?;
                Ok(result)
            }
            Err(error) => {
                transaction.abort();
                Err(error)
            }
        }
    }

    /// See [DatasetTransaction::add].
    pub fn add(&self, quad: &Quad<T>) -> Result<(), StorageError> {
        self.execute_write(|transaction| transaction.add(quad))
    }

    /// See [DatasetTransaction::add_parts].
    pub fn add_parts(
        &self,
        graph_name: &T,
        subject: &T,
        predicate: &T,
        object: &T,
    ) -> Result<(), StorageError> {
        self.execute_write(|transaction| {
            transaction.add_parts(graph_name, subject, predicate, object)
        })
    }

    /// See [DatasetTransaction::delete].
    pub fn delete(&self, quad: &Quad<T>) -> Result<(), StorageError> {
        self.execute_write(|transaction| transaction.delete(quad))
    }

    /// See [DatasetTransaction::delete_parts].
    pub fn delete_parts(
        &self,
        graph_name: &T,
        subject: &T,
        predicate: &T,
        object: &T,
    ) -> Result<(), StorageError> {
        self.execute_write(|transaction| {
            transaction.delete_parts(graph_name, subject, predicate, object)
        })
    }

    /// See [DatasetTransaction::find].
    ///
    /// The returned iterator keeps reading the snapshot it was created from.
    pub fn find(
        &self,
        graph_name: Option<&T>,
        subject: Option<&T>,
        predicate: Option<&T>,
        object: Option<&T>,
    ) -> Result<QuadIter<T>, StorageError> {
        self.execute_read(|transaction| transaction.find(graph_name, subject, predicate, object))
    }

    /// See [DatasetTransaction::find_named].
    pub fn find_named(
        &self,
        graph_name: Option<&T>,
        subject: Option<&T>,
        predicate: Option<&T>,
        object: Option<&T>,
    ) -> Result<QuadIter<T>, StorageError> {
        self.execute_read(|transaction| {
            transaction.find_named(graph_name, subject, predicate, object)
        })
    }

    /// See [DatasetTransaction::find_in_default_graph].
    pub fn find_in_default_graph(
        &self,
        subject: Option<&T>,
        predicate: Option<&T>,
        object: Option<&T>,
    ) -> Result<TripleIter<T>, StorageError> {
        self.execute_read(|transaction| {
            transaction.find_in_default_graph(subject, predicate, object)
        })
    }

    /// See [DatasetTransaction::find_in_union_graph].
    pub fn find_in_union_graph(
        &self,
        subject: Option<&T>,
        predicate: Option<&T>,
        object: Option<&T>,
    ) -> Result<TripleIter<T>, StorageError> {
        self.execute_read(|transaction| {
            transaction.find_in_union_graph(subject, predicate, object)
        })
    }

    /// See [DatasetTransaction::list_graph_nodes].
    pub fn list_graph_nodes(&self) -> Result<TermIter<T>, StorageError> {
        self.execute_read(|transaction| transaction.list_graph_nodes())
    }

    /// See [DatasetTransaction::contains].
    pub fn contains(&self, quad: &Quad<T>) -> Result<bool, StorageError> {
        self.execute_read(|transaction| transaction.contains(quad))
    }

    /// See [DatasetTransaction::contains_graph].
    pub fn contains_graph(&self, graph_name: &T) -> Result<bool, StorageError> {
        self.execute_read(|transaction| transaction.contains_graph(graph_name))
    }

    /// See [DatasetTransaction::is_empty].
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        self.execute_read(|transaction| transaction.is_empty())
    }

    /// See [DatasetTransaction::len].
    pub fn len(&self) -> Result<usize, StorageError> {
        self.execute_read(|transaction| transaction.len())
    }

    /// See [DatasetTransaction::add_graph].
    pub fn add_graph(
        &self,
        graph_name: &T,
        triples: impl IntoIterator<Item = Triple<T>>,
    ) -> Result<(), StorageError> {
        self.execute_write(|transaction| transaction.add_graph(graph_name, triples))
    }

    /// See [DatasetTransaction::remove_graph].
    pub fn remove_graph(&self, graph_name: &T) -> Result<(), StorageError> {
        self.execute_write(|transaction| transaction.remove_graph(graph_name))
    }

    /// See [DatasetTransaction::delete_any].
    pub fn delete_any(
        &self,
        graph_name: Option<&T>,
        subject: Option<&T>,
        predicate: Option<&T>,
        object: Option<&T>,
    ) -> Result<usize, StorageError> {
        self.execute_write(|transaction| {
            transaction.delete_any(graph_name, subject, predicate, object)
        })
    }

    /// See [DatasetTransaction::clear].
    pub fn clear(&self) -> Result<(), StorageError> {
        self.execute_write(|transaction| transaction.clear())
    }

    /// Returns a view of the default graph.
    pub fn default_graph(&self) -> GraphView<'_, T> {
        GraphView::new(self, T::default_graph())
    }

    /// Returns a view of the graph `graph_name`.
    pub fn graph(&self, graph_name: T) -> GraphView<'_, T> {
        GraphView::new(self, graph_name)
    }

    /// Returns a read-only view of the union of all named graphs.
    pub fn union_graph(&self) -> GraphView<'_, T> {
        GraphView::new(self, T::union_graph())
    }
}

impl<T: StoreTerm> Default for MemDataset<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StoreTerm> Debug for MemDataset<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemDataset")
            .field("options", &self.options)
            .field("generation", &self.generation())
            .field("active_readers", &self.active_readers())
            .field("write_locked", &self.gate.is_write_locked())
            .finish_non_exhaustive()
    }
}
