use crate::NodeConversionError;
use oxrdf::{BlankNode, GraphName, Literal, NamedNode, Subject, Term, Variable};
use std::fmt::{Display, Formatter};

/// A value that can occupy a slot of a quad or of a quad pattern.
///
/// Only *concrete* nodes (see [Node::is_concrete]) are ever stored. Variables and [Node::Any]
/// only appear in patterns, where both match anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// A concrete RDF term (IRI, blank node, or literal).
    Term(Term),
    /// A variable of a query pattern. Matches anything.
    Variable(Variable),
    /// The explicit "match anything" marker.
    Any,
    /// The name of the default graph.
    DefaultGraph,
    /// The name of the union graph, the merge of all named graphs.
    UnionGraph,
}

impl Node {
    /// Returns true if the node is a bound value, i.e., not a variable and not [Node::Any].
    pub fn is_concrete(&self) -> bool {
        matches!(self, Node::Term(_) | Node::DefaultGraph | Node::UnionGraph)
    }

    /// Returns true if the node names the default graph.
    pub fn is_default_graph(&self) -> bool {
        matches!(self, Node::DefaultGraph)
    }

    /// Returns true if the node names the union graph.
    pub fn is_union_graph(&self) -> bool {
        matches!(self, Node::UnionGraph)
    }

    /// Creates a named node [Node] without validating the IRI.
    pub fn named_unchecked(iri: impl Into<String>) -> Self {
        Node::Term(Term::NamedNode(NamedNode::new_unchecked(iri)))
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Term(term) => write!(f, "{term}"),
            Node::Variable(variable) => write!(f, "{variable}"),
            Node::Any => f.write_str("ANY"),
            Node::DefaultGraph => f.write_str("DEFAULT"),
            Node::UnionGraph => f.write_str("UNION"),
        }
    }
}

impl From<Term> for Node {
    fn from(term: Term) -> Self {
        Node::Term(term)
    }
}

impl From<NamedNode> for Node {
    fn from(node: NamedNode) -> Self {
        Node::Term(node.into())
    }
}

impl From<BlankNode> for Node {
    fn from(node: BlankNode) -> Self {
        Node::Term(node.into())
    }
}

impl From<Literal> for Node {
    fn from(literal: Literal) -> Self {
        Node::Term(literal.into())
    }
}

impl From<Subject> for Node {
    fn from(subject: Subject) -> Self {
        Node::Term(subject.into())
    }
}

impl From<Variable> for Node {
    fn from(variable: Variable) -> Self {
        Node::Variable(variable)
    }
}

impl From<GraphName> for Node {
    fn from(graph_name: GraphName) -> Self {
        match graph_name {
            GraphName::NamedNode(node) => node.into(),
            GraphName::BlankNode(node) => node.into(),
            GraphName::DefaultGraph => Node::DefaultGraph,
        }
    }
}

impl TryFrom<Node> for Term {
    type Error = NodeConversionError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match node {
            Node::Term(term) => Ok(term),
            node => Err(NodeConversionError::new(node, "a term")),
        }
    }
}

impl TryFrom<Node> for Subject {
    type Error = NodeConversionError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match node {
            Node::Term(Term::NamedNode(node)) => Ok(node.into()),
            Node::Term(Term::BlankNode(node)) => Ok(node.into()),
            node => Err(NodeConversionError::new(node, "a subject")),
        }
    }
}

impl TryFrom<Node> for NamedNode {
    type Error = NodeConversionError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match node {
            Node::Term(Term::NamedNode(node)) => Ok(node),
            node => Err(NodeConversionError::new(node, "a predicate")),
        }
    }
}

impl TryFrom<Node> for GraphName {
    type Error = NodeConversionError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match node {
            Node::Term(Term::NamedNode(node)) => Ok(node.into()),
            Node::Term(Term::BlankNode(node)) => Ok(node.into()),
            Node::DefaultGraph => Ok(GraphName::DefaultGraph),
            node => Err(NodeConversionError::new(node, "a graph name")),
        }
    }
}
