//! Contains the multi-order indexes of the dataset.
//!
//! An index stores tuples (quads or triples) in a particular ordering of their slots. For example,
//! the [QuadTableForm::GSPO] table stores the graph name on its first level while the
//! [QuadTableForm::OPSG] table starts with the object. A pattern is answered by the table in which
//! the bound slots form a prefix, as this avoids enumerating a level before the last bound one.
//!
//! Every level of a table is a [persistent map](crate::pmap::PMap), such that a transaction can
//! work on a private copy of the table and publish it with a single pointer assignment.

mod components;
mod error;
mod form;
mod set;
mod table;
mod trie;

pub use components::*;
pub use error::*;
pub use form::*;
pub use set::UnionGraphDedup;
pub(crate) use set::{QuadIndexSet, QuadIndexSetTxn, TripleIndexSet, TripleIndexSetTxn};
