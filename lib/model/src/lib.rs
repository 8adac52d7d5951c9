//! The RDF data model used by [RDF Mem](https://docs.rs/rdf-mem-storage/).
//!
//! Plain RDF terms come from [oxrdf] and are re-exported here. On top of them, [Node] adds the
//! values a quad store needs besides concrete terms: variables and the [Node::Any] wildcard for
//! query patterns, and the two distinguished graph names [Node::DefaultGraph] and
//! [Node::UnionGraph].

mod error;
mod node;

pub use error::*;
pub use node::*;

// Re-export some oxrdf types.
pub use oxrdf::{
    BlankNode, BlankNodeRef, GraphName, GraphNameRef, IriParseError, Literal, LiteralRef,
    NamedNode, NamedNodeRef, NamedOrBlankNode, Quad, QuadRef, Subject, SubjectRef, Term,
    TermRef, Triple, TripleRef, Variable, VariableRef,
};
