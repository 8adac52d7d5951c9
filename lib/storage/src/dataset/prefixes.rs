use dashmap::DashMap;
use rustc_hash::FxHasher;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasherDefault, Hash};

/// Stores the namespace prefixes of each graph of a dataset.
///
/// Prefix edits take effect immediately and are not part of dataset transactions. The dataset only
/// notifies the storage when a committed transaction removed a named graph.
pub trait PrefixStorage<T>: Send + Sync {
    /// Returns the prefix to namespace mapping of `graph`.
    fn prefixes(&self, graph: &T) -> BTreeMap<String, String>;

    /// Returns the namespace bound to `prefix` in `graph`.
    fn namespace(&self, graph: &T, prefix: &str) -> Option<String> {
        self.prefixes(graph).remove(prefix)
    }

    /// Binds `prefix` to `namespace` in `graph`, replacing an existing binding.
    fn set_prefix(&self, graph: &T, prefix: &str, namespace: &str);

    /// Removes the binding of `prefix` in `graph`.
    fn remove_prefix(&self, graph: &T, prefix: &str);

    /// Removes all bindings of `graph`.
    fn remove_graph(&self, graph: &T);
}

/// A [PrefixStorage] that keeps the prefixes in memory.
pub struct MemPrefixStorage<T> {
    graphs: DashMap<T, BTreeMap<String, String>, BuildHasherDefault<FxHasher>>,
}

impl<T: Eq + Hash> MemPrefixStorage<T> {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self {
            graphs: DashMap::with_hasher(BuildHasherDefault::default()),
        }
    }
}

impl<T: Eq + Hash> Default for MemPrefixStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone + Send + Sync> PrefixStorage<T> for MemPrefixStorage<T> {
    fn prefixes(&self, graph: &T) -> BTreeMap<String, String> {
        self.graphs
            .get(graph)
            .map(|prefixes| prefixes.clone())
            .unwrap_or_default()
    }

    fn namespace(&self, graph: &T, prefix: &str) -> Option<String> {
        self.graphs.get(graph)?.get(prefix).cloned()
    }

    fn set_prefix(&self, graph: &T, prefix: &str, namespace: &str) {
        self.graphs
            .entry(graph.clone())
            .or_default()
            .insert(prefix.to_owned(), namespace.to_owned());
    }

    fn remove_prefix(&self, graph: &T, prefix: &str) {
        let now_empty = self.graphs.get_mut(graph).is_some_and(|mut prefixes| {
            prefixes.remove(prefix);
            prefixes.is_empty()
        });
        if now_empty {
            self.graphs.remove_if(graph, |_, prefixes| prefixes.is_empty());
        }
    }

    fn remove_graph(&self, graph: &T) {
        self.graphs.remove(graph);
    }
}

impl<T: Eq + Hash> Debug for MemPrefixStorage<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemPrefixStorage")
            .field("graphs", &self.graphs.len())
            .finish()
    }
}
