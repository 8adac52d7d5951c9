use rdf_mem_model::{Node, NodeConversionError};
use std::fmt::{Display, Formatter};

/// A quad in canonical order: graph name, subject, predicate, object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad<T> {
    /// The graph name.
    pub graph_name: T,
    /// The subject.
    pub subject: T,
    /// The predicate.
    pub predicate: T,
    /// The object.
    pub object: T,
}

impl<T> Quad<T> {
    /// Creates a new [Quad].
    pub fn new(graph_name: T, subject: T, predicate: T, object: T) -> Self {
        Self {
            graph_name,
            subject,
            predicate,
            object,
        }
    }

    /// Drops the graph name.
    pub fn into_triple(self) -> Triple<T> {
        Triple::new(self.subject, self.predicate, self.object)
    }

    pub(crate) fn into_array(self) -> [T; 4] {
        [self.graph_name, self.subject, self.predicate, self.object]
    }

    pub(crate) fn from_array([graph_name, subject, predicate, object]: [T; 4]) -> Self {
        Self::new(graph_name, subject, predicate, object)
    }
}

impl<T: Display> Display for Quad<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.subject, self.predicate, self.object, self.graph_name
        )
    }
}

/// A triple in canonical order: subject, predicate, object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple<T> {
    /// The subject.
    pub subject: T,
    /// The predicate.
    pub predicate: T,
    /// The object.
    pub object: T,
}

impl<T> Triple<T> {
    /// Creates a new [Triple].
    pub fn new(subject: T, predicate: T, object: T) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Places the triple into the graph `graph_name`.
    pub fn in_graph(self, graph_name: T) -> Quad<T> {
        Quad::new(graph_name, self.subject, self.predicate, self.object)
    }

    pub(crate) fn into_array(self) -> [T; 3] {
        [self.subject, self.predicate, self.object]
    }

    pub(crate) fn from_array([subject, predicate, object]: [T; 3]) -> Self {
        Self::new(subject, predicate, object)
    }
}

impl<T: Display> Display for Triple<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

impl From<rdf_mem_model::Quad> for Quad<Node> {
    fn from(quad: rdf_mem_model::Quad) -> Self {
        Quad::new(
            quad.graph_name.into(),
            quad.subject.into(),
            quad.predicate.into(),
            quad.object.into(),
        )
    }
}

impl From<rdf_mem_model::Triple> for Triple<Node> {
    fn from(triple: rdf_mem_model::Triple) -> Self {
        Triple::new(
            triple.subject.into(),
            triple.predicate.into(),
            triple.object.into(),
        )
    }
}

impl TryFrom<Quad<Node>> for rdf_mem_model::Quad {
    type Error = NodeConversionError;

    fn try_from(quad: Quad<Node>) -> Result<Self, Self::Error> {
        Ok(rdf_mem_model::Quad {
            subject: quad.subject.try_into()?,
            predicate: quad.predicate.try_into()?,
            object: quad.object.try_into()?,
            graph_name: quad.graph_name.try_into()?,
        })
    }
}

impl TryFrom<Triple<Node>> for rdf_mem_model::Triple {
    type Error = NodeConversionError;

    fn try_from(triple: Triple<Node>) -> Result<Self, Self::Error> {
        Ok(rdf_mem_model::Triple {
            subject: triple.subject.try_into()?,
            predicate: triple.predicate.try_into()?,
            object: triple.object.try_into()?,
        })
    }
}
