use crate::index::UnionGraphDedup;

/// Options for creating a [MemDataset](crate::MemDataset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MemDatasetOptions {
    /// How the union graph collapses a triple that appears in several named graphs.
    pub union_graph_dedup: UnionGraphDedup,
}

impl MemDatasetOptions {
    /// Sets [MemDatasetOptions::union_graph_dedup].
    #[must_use]
    pub fn with_union_graph_dedup(mut self, union_graph_dedup: UnionGraphDedup) -> Self {
        self.union_graph_dedup = union_graph_dedup;
        self
    }
}
