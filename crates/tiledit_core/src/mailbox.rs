//! Single-slot delivery from a background task back to the UI executor.
//!
//! A mailbox resolves exactly once: either the sender's value arrives or
//! the waiter times out, never both.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const OPEN: u8 = 0;
const DELIVERED: u8 = 1;
const CLOSED: u8 = 2;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxError {
    #[error("timed out waiting for reply")]
    Timeout,
    #[error("reply sender dropped")]
    Disconnected,
}

/// Sending half. Consumed by [`send`](Self::send).
#[derive(Debug)]
pub struct MailboxSender<T> {
    tx: Sender<T>,
    state: Arc<AtomicU8>,
}

/// Receiving half.
#[derive(Debug)]
pub struct Mailbox<T> {
    rx: Receiver<T>,
    state: Arc<AtomicU8>,
}

/// Create a connected sender/mailbox pair.
pub fn mailbox<T>() -> (MailboxSender<T>, Mailbox<T>) {
    let (tx, rx) = bounded(1);
    let state = Arc::new(AtomicU8::new(OPEN));
    (
        MailboxSender {
            tx,
            state: state.clone(),
        },
        Mailbox { rx, state },
    )
}

impl<T> MailboxSender<T> {
    /// Deliver the value. Returns false when the waiter already gave up.
    pub fn send(self, value: T) -> bool {
        if self
            .state
            .compare_exchange(OPEN, DELIVERED, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.tx.send(value).is_ok()
    }
}

impl<T> Mailbox<T> {
    /// Block until the value arrives or `timeout` passes.
    pub fn wait(self, timeout: Duration) -> Result<T, MailboxError> {
        match self.rx.recv_timeout(timeout) {
            Ok(value) => Ok(value),
            Err(RecvTimeoutError::Disconnected) => Err(MailboxError::Disconnected),
            Err(RecvTimeoutError::Timeout) => {
                if self
                    .state
                    .compare_exchange(OPEN, CLOSED, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    return Err(MailboxError::Timeout);
                }
                // the sender won the race; its value is in flight
                self.rx.recv().map_err(|_| MailboxError::Disconnected)
            }
        }
    }

    /// Non-blocking poll.
    pub fn try_take(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}
