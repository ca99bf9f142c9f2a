//! Permit queue between the rate limiter and the workers
//!
//! A bounded mpsc channel whose capacity equals the total permit count, so
//! the rate limiter can never block on a full queue. Workers share the
//! receiving end; dropping the [`PermitSender`] closes the queue, and once
//! the remaining permits are drained every worker sees `None`.

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Largest capacity tokio's bounded channel accepts
const MAX_QUEUE_CAPACITY: usize = usize::MAX >> 3;

/// Authorization to execute exactly one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permit {
    sequence: u64,
}

impl Permit {
    /// Zero-based issue order of this permit
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Errors from issuing a permit
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PermitError {
    /// Queue is at capacity
    #[error("permit queue is full")]
    Full,

    /// Every receiver has been dropped
    #[error("permit queue is closed")]
    Closed,
}

/// Create a permit queue able to hold `capacity` permits
pub fn permit_queue(capacity: u64) -> (PermitSender, PermitQueue) {
    let capacity = usize::try_from(capacity)
        .unwrap_or(MAX_QUEUE_CAPACITY)
        .clamp(1, MAX_QUEUE_CAPACITY);
    let (tx, rx) = mpsc::channel(capacity);

    (
        PermitSender { tx, issued: 0 },
        PermitQueue {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Producing end, owned by the rate limiter
#[derive(Debug)]
pub struct PermitSender {
    tx: mpsc::Sender<Permit>,
    issued: u64,
}

impl PermitSender {
    /// Issue the next permit without waiting
    pub fn issue(&mut self) -> Result<Permit, PermitError> {
        let permit = Permit {
            sequence: self.issued,
        };
        self.tx.try_send(permit).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => PermitError::Full,
            mpsc::error::TrySendError::Closed(_) => PermitError::Closed,
        })?;
        self.issued += 1;
        Ok(permit)
    }

    /// Number of permits issued so far
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Close the queue. Permits already issued stay available to workers.
    pub fn close(self) {}
}

/// Consuming end, cloned into every worker
#[derive(Debug, Clone)]
pub struct PermitQueue {
    rx: Arc<Mutex<mpsc::Receiver<Permit>>>,
}

impl PermitQueue {
    /// Wait for the next permit
    ///
    /// Returns `None` once the queue is closed and drained. Cancel-safe: a
    /// dropped call releases its place without consuming a permit.
    pub async fn next(&self) -> Option<Permit> {
        self.rx.lock().await.recv().await
    }
}
