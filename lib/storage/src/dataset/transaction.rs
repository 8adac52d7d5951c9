use crate::dataset::{DatasetIter, MemDataset, QuadIter, TermIter, TripleIter};
use crate::error::{CorruptionError, StorageError, TransactionError};
use crate::index::{QuadIndexSetTxn, TripleIndexSetTxn};
use crate::term::{bound, StoreTerm};
use crate::tuple::{Quad, Triple};
use crate::txn::{GateTicket, ReadWrite, TxnType};
use std::sync::atomic::Ordering;
use std::thread::{self, ThreadId};
use tracing::{debug, error, warn};

/// The working roots of all tables of a dataset.
pub(super) struct TxnState<'dataset, T: StoreTerm> {
    quads: QuadIndexSetTxn<'dataset, T>,
    triples: TripleIndexSetTxn<'dataset, T>,
}

impl<'dataset, T: StoreTerm> TxnState<'dataset, T> {
    pub(super) fn new(
        quads: QuadIndexSetTxn<'dataset, T>,
        triples: TripleIndexSetTxn<'dataset, T>,
    ) -> Self {
        Self { quads, triples }
    }

    fn commit(self) {
        self.quads.commit();
        self.triples.commit();
    }

    fn abort(self) {
        self.quads.abort();
        self.triples.abort();
    }

    fn end(self) {
        self.quads.end();
        self.triples.end();
    }
}

/// An open transaction on a [MemDataset].
///
/// The transaction reads from a snapshot taken when it began (or when it was promoted) and only
/// publishes its changes on [commit](Self::commit). A transaction is bound to the thread that
/// began it and a thread can only have one open transaction per dataset.
///
/// Dropping a transaction that has neither been committed nor aborted aborts it.
///
/// ```
/// use rdf_mem_model::Node;
/// use rdf_mem_storage::{MemDataset, Triple, TxnType};
///
/// let dataset = MemDataset::<Node>::new();
/// let triple = Triple::new(
///     Node::named_unchecked("http://example.com/s"),
///     Node::named_unchecked("http://example.com/p"),
///     Node::named_unchecked("http://example.com/o"),
/// );
///
/// let mut transaction = dataset.begin(TxnType::ReadPromote)?;
/// assert_eq!(transaction.len()?, 0);
/// transaction.add(&triple.in_graph(Node::DefaultGraph))?; // Promotes the transaction.
/// transaction.commit()?;
///
/// assert_eq!(dataset.len()?, 1);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct DatasetTransaction<'dataset, T: StoreTerm> {
    dataset: &'dataset MemDataset<T>,
    txn_type: TxnType,
    version: u64,
    gate: GateTicket<'dataset>,
    state: Option<TxnState<'dataset, T>>,
    /// Named graphs removed by this transaction. Their prefixes are dropped on commit.
    dropped_graphs: Vec<T>,
    thread: ThreadId,
}

impl<'dataset, T: StoreTerm> DatasetTransaction<'dataset, T> {
    pub(super) fn begin(
        dataset: &'dataset MemDataset<T>,
        txn_type: TxnType,
    ) -> Result<Self, TransactionError> {
        let thread = thread::current().id();
        if !dataset.active_threads.insert(thread) {
            return Err(TransactionError::Nested);
        }

        let gate = dataset.gate.enter(txn_type.initial_mode());
        let (state, version) = dataset.start_state();
        debug!(%txn_type, version, "Began transaction");

        Ok(Self {
            dataset,
            txn_type,
            version,
            gate,
            state: Some(state),
            dropped_graphs: Vec::new(),
            thread,
        })
    }

    /// Returns the kind of this transaction.
    pub fn txn_type(&self) -> TxnType {
        self.txn_type
    }

    /// Returns whether the transaction currently reads or writes.
    pub fn mode(&self) -> ReadWrite {
        self.gate.mode()
    }

    /// Returns the generation of the dataset that this transaction observes.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Turns a promotable read transaction into a write transaction.
    ///
    /// Does nothing if the transaction already writes. Blocks until no other writer is active.
    /// A [TxnType::ReadPromote] transaction fails with [TransactionError::Stale] if another
    /// transaction committed since this one began. A [TxnType::ReadCommittedPromote] transaction
    /// instead continues on the latest committed state.
    ///
    /// On error, the transaction stays open as a reader.
    pub fn promote(&mut self) -> Result<(), TransactionError> {
        if self.mode() == ReadWrite::Write {
            return Ok(());
        }

        let read_committed = match self.txn_type {
            TxnType::ReadPromote => false,
            TxnType::ReadCommittedPromote => true,
            TxnType::Read | TxnType::Write => {
                return Err(TransactionError::NotPromotable(self.txn_type));
            }
        };

        if !read_committed {
            self.check_not_stale()?;
        }
        let writer = self.dataset.gate.lock_exclusive();
        if !read_committed {
            // Another writer may have committed while we were waiting for the gate.
            if let Err(error) = self.check_not_stale() {
                debug!(txn_type = %self.txn_type, version = self.version, "Promotion lost against a concurrent writer");
                return Err(error);
            }
        }

        self.gate.upgrade(writer);
        let (state, version) = self.dataset.start_state();
        if let Some(previous) = self.state.replace(state) {
            previous.end();
        }
        self.version = version;
        debug!(txn_type = %self.txn_type, version, "Promoted transaction");
        Ok(())
    }

    fn check_not_stale(&self) -> Result<(), TransactionError> {
        let generation = self.dataset.generation.load(Ordering::Acquire);
        if generation == self.version {
            Ok(())
        } else {
            Err(TransactionError::Stale {
                version: self.version,
            })
        }
    }

    /// Publishes all changes of a write transaction, or finishes a read transaction.
    pub fn commit(mut self) -> Result<(), StorageError> {
        let Some(state) = self.state.take() else {
            return Ok(());
        };

        match self.mode() {
            ReadWrite::Write => self.publish(state),
            ReadWrite::Read => {
                state.end();
                debug!(txn_type = %self.txn_type, "Committed read transaction");
                Ok(())
            }
        }
    }

    fn publish(&mut self, state: TxnState<'dataset, T>) -> Result<(), StorageError> {
        let generation = {
            let _system = self.dataset.system.lock();
            let generation = self.dataset.generation.load(Ordering::Acquire);
            if generation != self.version {
                state.abort();
                self.dropped_graphs.clear();
                error!(
                    txn_type = %self.txn_type,
                    expected = self.version,
                    generation,
                    "Generation changed while holding the write gate"
                );
                return Err(CorruptionError::msg(format!(
                    "The dataset generation changed from {} to {generation} during a write transaction.",
                    self.version
                ))
                .into());
            }

            state.commit();
            let generation = generation + 1;
            self.dataset.generation.store(generation, Ordering::Release);
            generation
        };

        for graph in self.dropped_graphs.drain(..) {
            self.dataset.prefixes.remove_graph(&graph);
        }
        debug!(txn_type = %self.txn_type, generation, "Committed transaction");
        Ok(())
    }

    /// Discards all changes of this transaction.
    pub fn abort(mut self) {
        if let Some(state) = self.state.take() {
            self.discard(state);
        }
    }

    fn discard(&mut self, state: TxnState<'dataset, T>) {
        match self.mode() {
            ReadWrite::Write => {
                let _system = self.dataset.system.lock();
                state.abort();
            }
            ReadWrite::Read => state.end(),
        }
        self.dropped_graphs.clear();
        debug!(txn_type = %self.txn_type, "Aborted transaction");
    }

    /// Finishes a read transaction.
    ///
    /// A write transaction must be finished with [commit](Self::commit) or
    /// [abort](Self::abort). Ending it aborts its changes and returns
    /// [TransactionError::UnterminatedWrite].
    pub fn end(mut self) -> Result<(), TransactionError> {
        let Some(state) = self.state.take() else {
            return Ok(());
        };

        match self.mode() {
            ReadWrite::Write => {
                warn!(txn_type = %self.txn_type, "Write transaction ended without commit or abort, aborting");
                self.discard(state);
                Err(TransactionError::UnterminatedWrite)
            }
            ReadWrite::Read => {
                state.end();
                debug!(txn_type = %self.txn_type, "Ended transaction");
                Ok(())
            }
        }
    }

    fn state(&self) -> Result<&TxnState<'dataset, T>, StorageError> {
        self.state.as_ref().ok_or_else(finished)
    }

    /// Returns the working state for a write. Promotes the transaction if necessary.
    fn writable(&mut self) -> Result<&mut TxnState<'dataset, T>, StorageError> {
        if self.mode() == ReadWrite::Read {
            if !self.txn_type.is_promotable() {
                return Err(TransactionError::ReadOnly(self.txn_type).into());
            }
            self.promote()?;
        }
        self.state.as_mut().ok_or_else(finished)
    }

    /// Adds `quad`. Quads in [the default graph](StoreTerm::default_graph) are stored as triples.
    ///
    /// Adding an existing quad has no effect.
    pub fn add(&mut self, quad: &Quad<T>) -> Result<(), StorageError> {
        check_storable(quad)?;
        let state = self.writable()?;
        if quad.graph_name.is_default_graph() {
            state.triples.add(&quad.clone().into_triple().into_array());
        } else {
            state.quads.add(&quad.clone().into_array());
        }
        Ok(())
    }

    /// Adds the quad with the given terms.
    pub fn add_parts(
        &mut self,
        graph_name: &T,
        subject: &T,
        predicate: &T,
        object: &T,
    ) -> Result<(), StorageError> {
        self.add(&Quad::new(
            graph_name.clone(),
            subject.clone(),
            predicate.clone(),
            object.clone(),
        ))
    }

    /// Deletes `quad`. Deleting an absent quad has no effect.
    pub fn delete(&mut self, quad: &Quad<T>) -> Result<(), StorageError> {
        check_storable(quad)?;
        let state = self.writable()?;
        if quad.graph_name.is_default_graph() {
            state.triples.delete(&quad.clone().into_triple().into_array());
        } else {
            state.quads.delete(&quad.clone().into_array());
        }
        Ok(())
    }

    /// Deletes the quad with the given terms.
    pub fn delete_parts(
        &mut self,
        graph_name: &T,
        subject: &T,
        predicate: &T,
        object: &T,
    ) -> Result<(), StorageError> {
        self.delete(&Quad::new(
            graph_name.clone(),
            subject.clone(),
            predicate.clone(),
            object.clone(),
        ))
    }

    /// Finds all quads that match the pattern. `None` and non-concrete terms match everything.
    ///
    /// A wildcard graph name matches the default graph and all named graphs. Quads of the
    /// default graph and of the union graph are returned with the respective graph name.
    pub fn find(
        &self,
        graph_name: Option<&T>,
        subject: Option<&T>,
        predicate: Option<&T>,
        object: Option<&T>,
    ) -> Result<QuadIter<T>, StorageError> {
        let state = self.state()?;
        let [subject, predicate, object] = [subject, predicate, object].map(bound);

        let Some(graph_name) = bound(graph_name) else {
            let default =
                default_graph_quads(state, subject.clone(), predicate.clone(), object.clone());
            let named = state
                .quads
                .find(&[None, subject, predicate, object])
                .map(Quad::from_array);
            return Ok(DatasetIter::new(default.chain(named)));
        };
        Ok(self.quads_in_graph(state, graph_name, subject, predicate, object))
    }

    /// Finds all quads of the named graphs that match the pattern.
    ///
    /// A wildcard graph name matches all named graphs. The default graph never matches.
    pub fn find_named(
        &self,
        graph_name: Option<&T>,
        subject: Option<&T>,
        predicate: Option<&T>,
        object: Option<&T>,
    ) -> Result<QuadIter<T>, StorageError> {
        let state = self.state()?;
        let [subject, predicate, object] = [subject, predicate, object].map(bound);

        Ok(match bound(graph_name) {
            None => DatasetIter::new(
                state
                    .quads
                    .find(&[None, subject, predicate, object])
                    .map(Quad::from_array),
            ),
            Some(graph_name) if graph_name.is_default_graph() => DatasetIter::empty(),
            Some(graph_name) => self.quads_in_graph(state, graph_name, subject, predicate, object),
        })
    }

    fn quads_in_graph(
        &self,
        state: &TxnState<'dataset, T>,
        graph_name: T,
        subject: Option<T>,
        predicate: Option<T>,
        object: Option<T>,
    ) -> QuadIter<T> {
        if graph_name.is_default_graph() {
            return DatasetIter::new(default_graph_quads(state, subject, predicate, object));
        }
        if graph_name.is_union_graph() {
            let triples = self.union_graph_triples(state, subject, predicate, object);
            return DatasetIter::new(triples.map(|triple| triple.in_graph(T::union_graph())));
        }
        DatasetIter::new(
            state
                .quads
                .find(&[Some(graph_name), subject, predicate, object])
                .map(Quad::from_array),
        )
    }

    fn union_graph_triples(
        &self,
        state: &TxnState<'dataset, T>,
        subject: Option<T>,
        predicate: Option<T>,
        object: Option<T>,
    ) -> impl Iterator<Item = Triple<T>> + Send + 'static {
        state
            .quads
            .find_in_union_graph(
                subject,
                predicate,
                object,
                self.dataset.options.union_graph_dedup,
            )
            .map(Triple::from_array)
    }

    /// Finds all triples of the default graph that match the pattern.
    pub fn find_in_default_graph(
        &self,
        subject: Option<&T>,
        predicate: Option<&T>,
        object: Option<&T>,
    ) -> Result<TripleIter<T>, StorageError> {
        let state = self.state()?;
        let [subject, predicate, object] = [subject, predicate, object].map(bound);
        Ok(DatasetIter::new(
            default_graph_triples(state, subject, predicate, object),
        ))
    }

    /// Finds the distinct triples of all named graphs that match the pattern.
    pub fn find_in_union_graph(
        &self,
        subject: Option<&T>,
        predicate: Option<&T>,
        object: Option<&T>,
    ) -> Result<TripleIter<T>, StorageError> {
        let state = self.state()?;
        let [subject, predicate, object] = [subject, predicate, object].map(bound);
        Ok(DatasetIter::new(
            self.union_graph_triples(state, subject, predicate, object),
        ))
    }

    /// Finds the triples of a single graph, which may also be the default or the union graph.
    ///
    /// A non-concrete graph name matches nothing.
    pub fn find_in_graph(
        &self,
        graph_name: &T,
        subject: Option<&T>,
        predicate: Option<&T>,
        object: Option<&T>,
    ) -> Result<TripleIter<T>, StorageError> {
        let state = self.state()?;
        let Some(graph_name) = bound(Some(graph_name)) else {
            return Ok(DatasetIter::empty());
        };
        let [subject, predicate, object] = [subject, predicate, object].map(bound);
        let quads = self.quads_in_graph(state, graph_name, subject, predicate, object);
        Ok(DatasetIter::new(quads.map(Quad::into_triple)))
    }

    /// Enumerates the names of all named graphs that hold at least one quad.
    pub fn list_graph_nodes(&self) -> Result<TermIter<T>, StorageError> {
        Ok(DatasetIter::new(self.state()?.quads.list_graph_names()))
    }

    /// Returns true if a quad matches `quad`. Non-concrete terms match everything.
    pub fn contains(&self, quad: &Quad<T>) -> Result<bool, StorageError> {
        let state = self.state()?;
        let concrete = [&quad.graph_name, &quad.subject, &quad.predicate, &quad.object]
            .iter()
            .all(|term| term.is_concrete());

        if concrete && quad.graph_name.is_default_graph() {
            return Ok(state
                .triples
                .contains(&quad.clone().into_triple().into_array()));
        }
        if concrete && !quad.graph_name.is_union_graph() {
            return Ok(state.quads.contains(&quad.clone().into_array()));
        }

        let mut matches = self.find(
            Some(&quad.graph_name),
            Some(&quad.subject),
            Some(&quad.predicate),
            Some(&quad.object),
        )?;
        Ok(matches.next().is_some())
    }

    /// Returns true if the dataset has a graph with the name `graph_name`.
    ///
    /// The default and the union graph always exist. A named graph exists while it holds a quad.
    pub fn contains_graph(&self, graph_name: &T) -> Result<bool, StorageError> {
        let state = self.state()?;
        if graph_name.is_default_graph() || graph_name.is_union_graph() {
            return Ok(true);
        }
        let Some(graph_name) = bound(Some(graph_name)) else {
            return Ok(false);
        };
        Ok(state
            .quads
            .find(&[Some(graph_name), None, None, None])
            .next()
            .is_some())
    }

    /// Returns true if neither the default graph nor a named graph holds a quad.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        let state = self.state()?;
        Ok(state.triples.is_empty() && state.quads.is_empty())
    }

    /// Returns the number of quads, including the triples of the default graph.
    pub fn len(&self) -> Result<usize, StorageError> {
        let state = self.state()?;
        Ok(state.triples.len() + state.quads.len())
    }

    /// Replaces the content of the graph `graph_name` with `triples`.
    ///
    /// The prefixes of the graph are kept.
    pub fn add_graph(
        &mut self,
        graph_name: &T,
        triples: impl IntoIterator<Item = Triple<T>>,
    ) -> Result<(), StorageError> {
        self.clear_graph(graph_name)?;
        for triple in triples {
            self.add(&triple.in_graph(graph_name.clone()))?;
        }
        Ok(())
    }

    /// Removes all quads of the graph `graph_name`.
    ///
    /// Removing a named graph also drops its prefixes once the transaction commits.
    pub fn remove_graph(&mut self, graph_name: &T) -> Result<(), StorageError> {
        self.clear_graph(graph_name)?;
        if !graph_name.is_default_graph() {
            self.dropped_graphs.push(graph_name.clone());
        }
        Ok(())
    }

    fn clear_graph(&mut self, graph_name: &T) -> Result<(), StorageError> {
        if graph_name.is_union_graph() {
            return Err(StorageError::ReadOnlyUnionGraph);
        }
        if !graph_name.is_concrete() {
            return Err(StorageError::NonConcreteTerm(graph_name.to_string()));
        }

        if graph_name.is_default_graph() {
            self.writable()?.triples.clear();
            return Ok(());
        }
        self.delete_any(Some(graph_name), None, None, None)?;
        Ok(())
    }

    /// Deletes all quads that match the pattern and returns how many were deleted.
    ///
    /// A wildcard graph name matches the default graph and all named graphs.
    pub fn delete_any(
        &mut self,
        graph_name: Option<&T>,
        subject: Option<&T>,
        predicate: Option<&T>,
        object: Option<&T>,
    ) -> Result<usize, StorageError> {
        if graph_name.is_some_and(StoreTerm::is_union_graph) {
            return Err(StorageError::ReadOnlyUnionGraph);
        }

        self.writable()?;
        let matches = self
            .find(graph_name, subject, predicate, object)?
            .collect::<Vec<_>>();
        let state = self.writable()?;
        for quad in &matches {
            if quad.graph_name.is_default_graph() {
                state.triples.delete(&quad.clone().into_triple().into_array());
            } else {
                state.quads.delete(&quad.clone().into_array());
            }
        }
        Ok(matches.len())
    }

    /// Removes all quads. The prefixes of all named graphs are dropped once the transaction
    /// commits.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        let state = self.writable()?;
        let graphs = state.quads.list_graph_names().collect::<Vec<_>>();
        state.quads.clear();
        state.triples.clear();
        self.dropped_graphs.extend(graphs);
        Ok(())
    }
}

impl<T: StoreTerm> Drop for DatasetTransaction<'_, T> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            match self.mode() {
                ReadWrite::Write => {
                    warn!(txn_type = %self.txn_type, "Dropped an unfinished write transaction, aborting");
                    self.discard(state);
                }
                ReadWrite::Read => state.end(),
            }
        }
        self.dataset.active_threads.remove(&self.thread);
    }
}

fn default_graph_quads<T: StoreTerm>(
    state: &TxnState<'_, T>,
    subject: Option<T>,
    predicate: Option<T>,
    object: Option<T>,
) -> impl Iterator<Item = Quad<T>> + Send + 'static {
    default_graph_triples(state, subject, predicate, object)
        .map(|triple| triple.in_graph(T::default_graph()))
}

fn default_graph_triples<T: StoreTerm>(
    state: &TxnState<'_, T>,
    subject: Option<T>,
    predicate: Option<T>,
    object: Option<T>,
) -> impl Iterator<Item = Triple<T>> + Send + 'static {
    state
        .triples
        .find(&[subject, predicate, object])
        .map(Triple::from_array)
}

fn finished() -> StorageError {
    CorruptionError::msg("The transaction has already finished.").into()
}

fn check_storable<T: StoreTerm>(quad: &Quad<T>) -> Result<(), StorageError> {
    if quad.graph_name.is_union_graph() {
        return Err(StorageError::ReadOnlyUnionGraph);
    }
    for term in [&quad.graph_name, &quad.subject, &quad.predicate, &quad.object] {
        if !term.is_concrete() {
            return Err(StorageError::NonConcreteTerm(term.to_string()));
        }
    }
    Ok(())
}
