use rdf_mem_model::Node;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// The data structure that is used to represent a single RDF term in the store.
///
/// The store never looks inside a term. It only compares and hashes terms, asks whether a term is
/// a bound value, and recognizes the two distinguished graph names.
pub trait StoreTerm: Debug + Display + Clone + Eq + Hash + Send + Sync + 'static {
    /// Returns true for bound values, false for variables and wildcards.
    ///
    /// In patterns, a non-concrete term matches anything, exactly like an absent one.
    fn is_concrete(&self) -> bool {
        true
    }

    /// Returns true if the term names the default graph.
    fn is_default_graph(&self) -> bool;

    /// Returns true if the term names the union graph.
    fn is_union_graph(&self) -> bool;

    /// The graph name given to quads of the default graph.
    fn default_graph() -> Self;

    /// The graph name given to quads of the union graph.
    fn union_graph() -> Self;
}

impl StoreTerm for Node {
    fn is_concrete(&self) -> bool {
        Node::is_concrete(self)
    }

    fn is_default_graph(&self) -> bool {
        Node::is_default_graph(self)
    }

    fn is_union_graph(&self) -> bool {
        Node::is_union_graph(self)
    }

    fn default_graph() -> Self {
        Node::DefaultGraph
    }

    fn union_graph() -> Self {
        Node::UnionGraph
    }
}

/// Turns a pattern slot into its bound value. Absent and non-concrete terms become `None`.
pub(crate) fn bound<T: StoreTerm>(slot: Option<&T>) -> Option<T> {
    slot.filter(|term| term.is_concrete()).cloned()
}
