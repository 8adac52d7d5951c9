use crate::Node;
use thiserror::Error;

/// Raised if a [Node] cannot be converted into a more specific RDF term (e.g., a literal used as
/// a subject, or a variable that should become a concrete term).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The node {node} cannot be used as {target}.")]
pub struct NodeConversionError {
    node: Node,
    target: &'static str,
}

impl NodeConversionError {
    /// Creates a new [NodeConversionError].
    pub fn new(node: Node, target: &'static str) -> Self {
        Self { node, target }
    }

    /// Returns the node that could not be converted.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Returns a description of the requested target type.
    pub fn target(&self) -> &'static str {
        self.target
    }
}
