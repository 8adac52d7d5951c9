use crate::txn::ReadWrite;
use parking_lot::{FairMutex, FairMutexGuard};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Admits any number of readers and a single writer.
///
/// Readers never wait: they work on immutable snapshots, so a writer cannot disturb them. Writers
/// queue on a fair mutex and are admitted in arrival order.
pub(crate) struct TransactionGate {
    writer: FairMutex<()>,
    readers: AtomicUsize,
}

impl TransactionGate {
    pub(crate) fn new() -> Self {
        Self {
            writer: FairMutex::new(()),
            readers: AtomicUsize::new(0),
        }
    }

    /// Enters the gate. Blocks while another writer holds the gate if `mode` is
    /// [ReadWrite::Write].
    pub(crate) fn enter(&self, mode: ReadWrite) -> GateTicket<'_> {
        match mode {
            ReadWrite::Read => {
                self.readers.fetch_add(1, Ordering::AcqRel);
                GateTicket::Read {
                    _reader: ReaderTicket {
                        readers: &self.readers,
                        _thread_bound: PhantomData,
                    },
                }
            }
            ReadWrite::Write => GateTicket::Write {
                _writer: self.lock_exclusive(),
            },
        }
    }

    /// Acquires the exclusive mode of the gate. Used to promote a reader.
    pub(crate) fn lock_exclusive(&self) -> FairMutexGuard<'_, ()> {
        self.writer.lock()
    }

    /// Returns the number of open readers.
    pub(crate) fn active_readers(&self) -> usize {
        self.readers.load(Ordering::Acquire)
    }

    /// Returns true if a writer holds the gate.
    pub(crate) fn is_write_locked(&self) -> bool {
        self.writer.is_locked()
    }
}

/// Proof that a transaction has entered the [TransactionGate]. Leaves the gate when dropped.
///
/// A ticket is bound to the thread that acquired it.
pub(crate) enum GateTicket<'gate> {
    Read { _reader: ReaderTicket<'gate> },
    Write { _writer: FairMutexGuard<'gate, ()> },
}

impl<'gate> GateTicket<'gate> {
    pub(crate) fn mode(&self) -> ReadWrite {
        match self {
            GateTicket::Read { .. } => ReadWrite::Read,
            GateTicket::Write { .. } => ReadWrite::Write,
        }
    }

    /// Turns a read ticket into a write ticket. The reader leaves the gate.
    pub(crate) fn upgrade(&mut self, writer: FairMutexGuard<'gate, ()>) {
        *self = GateTicket::Write { _writer: writer };
    }
}

pub(crate) struct ReaderTicket<'gate> {
    readers: &'gate AtomicUsize,
    _thread_bound: PhantomData<*const ()>,
}

impl Drop for ReaderTicket<'_> {
    fn drop(&mut self) {
        self.readers.fetch_sub(1, Ordering::AcqRel);
    }
}
