#![doc(test(attr(deny(warnings))))]

//! A transactional, multi-index, in-memory RDF dataset.
//!
//! The dataset stores the default graph as triples and all named graphs as quads. Every tuple is
//! kept in several sort orders at once (six for quads, three for triples), and a pattern query is
//! answered by the order in which the bound slots form a prefix.
//!
//! All tables are built from [persistent maps](pmap::PMap). A transaction works on its own
//! snapshot of the table roots and a write commit publishes the new roots with a pointer swap.
//! Readers never wait for writers and a single writer is admitted at a time.
//!
//! ```
//! use rdf_mem_model::Node;
//! use rdf_mem_storage::{MemDataset, Quad, TxnType};
//!
//! let dataset = MemDataset::<Node>::new();
//! let quad = Quad::new(
//!     Node::named_unchecked("http://example.com/g"),
//!     Node::named_unchecked("http://example.com/s"),
//!     Node::named_unchecked("http://example.com/p"),
//!     Node::named_unchecked("http://example.com/o"),
//! );
//!
//! let mut transaction = dataset.begin(TxnType::Write)?;
//! transaction.add(&quad)?;
//! transaction.commit()?;
//!
//! assert!(dataset.contains(&quad)?);
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod dataset;
mod error;
pub mod index;
pub mod pmap;
mod term;
mod tuple;
mod txn;

pub use dataset::{
    DatasetIter, DatasetTransaction, GraphView, MemDataset, MemDatasetOptions, MemPrefixStorage,
    PrefixStorage, QuadIter, TermIter, TripleIter,
};
pub use error::{CorruptionError, StorageError, TransactionError};
pub use index::UnionGraphDedup;
pub use term::StoreTerm;
pub use tuple::{Quad, Triple};
pub use txn::{ReadWrite, TxnType};
