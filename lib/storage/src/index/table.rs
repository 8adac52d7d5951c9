use crate::index::trie::TrieLevel;
use crate::index::IndexComponents;
use crate::term::StoreTerm;
use parking_lot::RwLock;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::trace;

/// A lazy sequence of tuples in canonical order.
pub(crate) type TupleIter<T, const N: usize> = Box<dyn Iterator<Item = [T; N]> + Send>;

/// A table that stores tuples with `N` slots in a single order.
///
/// The table only holds the last committed root. Reads and writes happen on a [TableTxn] that
/// works on its own copy of the root.
pub(crate) struct PMapTupleTable<T, L, const N: usize> {
    components: IndexComponents<N>,
    shared: RwLock<L>,
    _term: PhantomData<fn() -> T>,
}

impl<T: StoreTerm, L: TrieLevel<T>, const N: usize> PMapTupleTable<T, L, N> {
    /// Creates an empty table ordered by `components`.
    pub(crate) fn new(components: IndexComponents<N>) -> Self {
        Self {
            components,
            shared: RwLock::new(L::default()),
            _term: PhantomData,
        }
    }

    /// Starts working on a copy of the last committed root.
    pub(crate) fn begin(&self) -> TableTxn<'_, T, L, N> {
        TableTxn {
            table: self,
            root: self.shared.read().clone(),
        }
    }
}

/// The working state of a table inside a transaction.
pub(crate) struct TableTxn<'table, T, L, const N: usize> {
    table: &'table PMapTupleTable<T, L, N>,
    root: L,
}

impl<T: StoreTerm, L: TrieLevel<T>, const N: usize> TableTxn<'_, T, L, N> {
    pub(crate) fn root(&self) -> &L {
        &self.root
    }

    pub(crate) fn len(&self) -> usize {
        self.root.count()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Adds a tuple given in canonical order. Adding an existing tuple has no effect.
    pub(crate) fn add(&mut self, tuple: &[T; N]) {
        let internal = self.table.components.to_internal(tuple);
        self.root = self.root.insert(&internal);
    }

    /// Deletes a tuple given in canonical order. Deleting an absent tuple has no effect.
    pub(crate) fn delete(&mut self, tuple: &[T; N]) {
        let internal = self.table.components.to_internal(tuple);
        if let Some(root) = self.root.remove(&internal) {
            self.root = root;
        }
    }

    pub(crate) fn contains(&self, tuple: &[T; N]) -> bool {
        let internal = self.table.components.to_internal(tuple);
        self.root.contains(&internal)
    }

    /// Finds all tuples that match `pattern`, given in canonical order. A `None` slot matches
    /// everything.
    ///
    /// The result holds on to the current working root. Later updates are not observed.
    pub(crate) fn find(&self, pattern: &[Option<T>; N]) -> TupleIter<T, N> {
        let components = self.table.components;
        let internal = components
            .to_internal(pattern)
            .into_iter()
            .collect::<Arc<[_]>>();
        Box::new(
            self.root
                .scan(internal, 0, Vec::with_capacity(N))
                .map(move |tuple| components.to_canonical(&tuple)),
        )
    }

    /// Drops every tuple of the working root.
    pub(crate) fn clear(&mut self) {
        self.root = L::default();
    }

    /// Publishes the working root.
    pub(crate) fn commit(self) {
        trace!(table = %self.table.components, "Published working root");
        *self.table.shared.write() = self.root;
    }

    /// Discards the working root.
    pub(crate) fn abort(self) {
        trace!(table = %self.table.components, "Discarded working root");
    }

    /// Finishes a read. Reads never change the working root, so there is nothing to publish.
    pub(crate) fn end(self) {
        trace!(table = %self.table.components, "Released snapshot");
    }
}
