//! Persistent (immutable, structurally shared) collections.
//!
//! [PMap] is a hash array mapped trie. Updates copy the path from the root to the changed entry
//! and share everything else with the previous version. This makes taking a snapshot a reference
//! count increment, and publishing a new version a single pointer assignment, which is what the
//! transactional tables of this crate are built on.

mod iter;
mod map;
mod node;
mod set;

pub use iter::{Entries, Iter};
pub use map::PMap;
pub use set::{Elements, PSet};
