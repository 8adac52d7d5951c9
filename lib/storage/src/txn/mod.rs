//! The transaction kinds of a dataset and the gate that admits them.

mod gate;

pub(crate) use gate::{GateTicket, TransactionGate};
use std::fmt::{Display, Formatter};

/// The kind of a dataset transaction, chosen when it begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxnType {
    /// Reads a snapshot. Can never write.
    Read,
    /// Starts with exclusive write access.
    Write,
    /// Starts as a reader and becomes a writer on the first write, unless another writer committed
    /// in the meantime.
    ReadPromote,
    /// Starts as a reader and becomes a writer on the first write, even if another writer committed
    /// in the meantime. The writer then continues on the latest committed state.
    ReadCommittedPromote,
}

impl TxnType {
    /// Returns the mode in which a transaction of this kind starts.
    pub fn initial_mode(self) -> ReadWrite {
        match self {
            TxnType::Write => ReadWrite::Write,
            TxnType::Read | TxnType::ReadPromote | TxnType::ReadCommittedPromote => {
                ReadWrite::Read
            }
        }
    }

    /// Returns true if a transaction of this kind can become a writer.
    pub fn is_promotable(self) -> bool {
        matches!(self, TxnType::ReadPromote | TxnType::ReadCommittedPromote)
    }
}

impl Display for TxnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TxnType::Read => write!(f, "READ"),
            TxnType::Write => write!(f, "WRITE"),
            TxnType::ReadPromote => write!(f, "READ_PROMOTE"),
            TxnType::ReadCommittedPromote => write!(f, "READ_COMMITTED_PROMOTE"),
        }
    }
}

/// Whether a transaction currently reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadWrite {
    /// Reads a snapshot.
    Read,
    /// Holds the exclusive write access of the dataset.
    Write,
}

impl Display for ReadWrite {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadWrite::Read => write!(f, "READ"),
            ReadWrite::Write => write!(f, "WRITE"),
        }
    }
}
