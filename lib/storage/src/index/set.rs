use crate::index::table::{PMapTupleTable, TableTxn, TupleIter};
use crate::index::trie::{QuadTrie, TermScan, TrieLevel, TripleTrie};
use crate::index::{QuadTableForm, TableForm, TripleTableForm, TupleSlots};
use crate::term::StoreTerm;
use itertools::Itertools;
use std::marker::PhantomData;
use tracing::trace;

/// How [the union graph](crate::MemDataset::find_in_union_graph) collapses a triple that is part
/// of several named graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnionGraphDedup {
    /// Scans a table that stores the graph name last, such that all copies of a triple are
    /// adjacent, and skips a triple equal to its predecessor. Needs no extra memory.
    #[default]
    Adjacent,
    /// Remembers every triple returned so far in a hash set.
    SeenSet,
}

/// Keeps one table per [TableForm] with identical content and routes every pattern to the table
/// that answers it best.
pub(crate) struct IndexSet<T, F, L, const N: usize> {
    tables: Vec<PMapTupleTable<T, L, N>>,
    _form: PhantomData<F>,
}

/// The named graphs of a dataset.
pub(crate) type QuadIndexSet<T> = IndexSet<T, QuadTableForm, QuadTrie<T>, 4>;

/// The default graph of a dataset.
pub(crate) type TripleIndexSet<T> = IndexSet<T, TripleTableForm, TripleTrie<T>, 3>;

impl<T: StoreTerm, F: TableForm<N>, L: TrieLevel<T>, const N: usize> IndexSet<T, F, L, N> {
    pub(crate) fn new() -> Self {
        Self {
            tables: F::ALL
                .iter()
                .map(|form| PMapTupleTable::new(form.components()))
                .collect(),
            _form: PhantomData,
        }
    }

    /// Starts a transaction on every table.
    pub(crate) fn begin(&self) -> IndexSetTxn<'_, T, F, L, N> {
        IndexSetTxn {
            tables: self.tables.iter().map(PMapTupleTable::begin).collect(),
            _form: PhantomData,
        }
    }
}

/// The working state of an [IndexSet] inside a transaction.
pub(crate) struct IndexSetTxn<'set, T, F, L, const N: usize> {
    tables: Vec<TableTxn<'set, T, L, N>>,
    _form: PhantomData<F>,
}

pub(crate) type QuadIndexSetTxn<'set, T> = IndexSetTxn<'set, T, QuadTableForm, QuadTrie<T>, 4>;

pub(crate) type TripleIndexSetTxn<'set, T> =
    IndexSetTxn<'set, T, TripleTableForm, TripleTrie<T>, 3>;

impl<T: StoreTerm, F: TableForm<N>, L: TrieLevel<T>, const N: usize> IndexSetTxn<'_, T, F, L, N> {
    fn table(&self, form: F) -> &TableTxn<'_, T, L, N> {
        &self.tables[form.ordinal()]
    }

    pub(crate) fn len(&self) -> usize {
        self.table(F::DEFAULT).len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.table(F::DEFAULT).is_empty()
    }

    /// Adds `tuple` to every table.
    pub(crate) fn add(&mut self, tuple: &[T; N]) {
        for table in &mut self.tables {
            table.add(tuple);
        }
    }

    /// Deletes `tuple` from every table.
    pub(crate) fn delete(&mut self, tuple: &[T; N]) {
        for table in &mut self.tables {
            table.delete(tuple);
        }
    }

    pub(crate) fn contains(&self, tuple: &[T; N]) -> bool {
        self.table(F::DEFAULT).contains(tuple)
    }

    /// Finds all tuples that match `pattern` in the table whose order has the bound slots as a
    /// prefix.
    pub(crate) fn find(&self, pattern: &[Option<T>; N]) -> TupleIter<T, N> {
        let bound = TupleSlots::bound_in(pattern);
        let form = F::choose_from(bound);
        trace!(%bound, %form, "Chose table form");
        self.table(form).find(pattern)
    }

    pub(crate) fn clear(&mut self) {
        for table in &mut self.tables {
            table.clear();
        }
    }

    pub(crate) fn commit(self) {
        self.tables.into_iter().for_each(TableTxn::commit);
    }

    pub(crate) fn abort(self) {
        self.tables.into_iter().for_each(TableTxn::abort);
    }

    pub(crate) fn end(self) {
        self.tables.into_iter().for_each(TableTxn::end);
    }
}

impl<T: StoreTerm> QuadIndexSetTxn<'_, T> {
    /// Enumerates the distinct graph names, i.e., the first level of the GSPO table.
    pub(crate) fn list_graph_names(&self) -> TermScan<T> {
        self.table(QuadTableForm::GSPO).root().keys()
    }

    /// Finds the distinct triples of all named graphs that match the given pattern.
    pub(crate) fn find_in_union_graph(
        &self,
        subject: Option<T>,
        predicate: Option<T>,
        object: Option<T>,
        dedup: UnionGraphDedup,
    ) -> TupleIter<T, 3> {
        let form = if object.is_some() && subject.is_none() {
            QuadTableForm::OPSG
        } else {
            QuadTableForm::SPOG
        };
        trace!(%form, ?dedup, "Scanning the union graph");

        let triples = self
            .table(form)
            .find(&[None, subject, predicate, object])
            .map(|[_, subject, predicate, object]| [subject, predicate, object]);
        match dedup {
            UnionGraphDedup::Adjacent => Box::new(triples.dedup()),
            UnionGraphDedup::SeenSet => Box::new(triples.unique()),
        }
    }
}
