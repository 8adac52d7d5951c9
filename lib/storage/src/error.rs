use crate::txn::TxnType;

/// An error related to storage operations (reads, writes, transactions).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The transaction protocol was violated, or a promotion lost against a concurrent writer.
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    /// Error related to an internal inconsistency.
    #[error(transparent)]
    Corruption(#[from] CorruptionError),
    /// Variables and wildcards can only be used in patterns.
    #[error("Only concrete terms can be stored, got {0}.")]
    NonConcreteTerm(String),
    /// The union graph is computed from the named graphs and cannot be modified.
    #[error("The union graph is read-only.")]
    ReadOnlyUnionGraph,
}

impl StorageError {
    /// Returns true if the failed operation can succeed when retried in a fresh transaction.
    pub fn is_retryable(&self) -> bool {
        match self {
            StorageError::Transaction(error) => error.is_retryable(),
            _ => false,
        }
    }
}

/// A violation of the transaction protocol, or a failed promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    /// The current thread already has an open transaction on this dataset.
    #[error("Transactions cannot be nested.")]
    Nested,
    /// A write was attempted in a transaction that cannot write.
    #[error("Cannot modify the dataset in a {0} transaction.")]
    ReadOnly(TxnType),
    /// Only [TxnType::ReadPromote] and [TxnType::ReadCommittedPromote] can be promoted.
    #[error("A {0} transaction cannot be promoted.")]
    NotPromotable(TxnType),
    /// Another writer committed after this transaction started.
    #[error("Cannot promote the transaction: the dataset changed since version {version}.")]
    Stale {
        /// The version that the transaction observed when it started.
        version: u64,
    },
    /// A write transaction was ended without commit or abort. It has been aborted.
    #[error("Write transaction ended without commit or abort; its changes were discarded.")]
    UnterminatedWrite,
}

impl TransactionError {
    /// Returns true for a lost race against a concurrent writer, as opposed to a protocol bug.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransactionError::Stale { .. })
    }
}

/// An error returned if the dataset detected an inconsistency in its own state.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct CorruptionError(#[from] CorruptionErrorKind);

/// An error returned if the dataset detected an inconsistency in its own state.
#[derive(Debug, thiserror::Error)]
enum CorruptionErrorKind {
    #[error("{0}")]
    Msg(String),
}

impl CorruptionError {
    /// Builds an error from a printable error message.
    #[inline]
    pub fn msg(msg: impl Into<String>) -> Self {
        Self(CorruptionErrorKind::Msg(msg.into()))
    }
}
