use crate::index::TupleSlot;
use thiserror::Error;

/// An invalid slot order for an index.
#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum IndexComponentsError {
    /// A slot appears more than once.
    #[error("Duplicate indexed component given: {0}.")]
    Duplicate(TupleSlot),
    /// A slot that does not exist in tuples of the given arity.
    #[error("The slot {0} is not part of a tuple with {1} slots.")]
    InvalidSlot(TupleSlot, usize),
    /// A character that does not name a slot.
    #[error("Unknown slot '{0}', expected one of G, S, P, O.")]
    UnknownSlot(char),
    /// Not every slot of the tuple is covered.
    #[error("Expected {expected} slots, got {actual}.")]
    Length {
        /// The arity of the tuple.
        expected: usize,
        /// The number of given slots.
        actual: usize,
    },
    /// A valid permutation that no table of the dataset uses.
    #[error("No table is ordered as {0}.")]
    UnknownForm(String),
}
