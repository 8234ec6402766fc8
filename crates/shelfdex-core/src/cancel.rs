//! Cooperative cancellation for the ingest pipeline

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam::channel::{bounded, Receiver, Sender};

/// Clonable cancellation signal.
///
/// The flag answers "was cancel requested"; the channel lets a producer
/// blocked on a full queue wake up inside `select!`.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            tx,
            rx,
        }
    }

    /// Request cancellation. Safe to call from a signal handler thread.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        let _ = self.tx.try_send(());
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Channel that becomes ready once cancellation is requested
    pub(crate) fn signal(&self) -> &Receiver<()> {
        &self.rx
    }

    /// Put the wake-up message back after consuming it, so every waiter sees it
    pub(crate) fn rearm(&self) {
        let _ = self.tx.try_send(());
    }
}
