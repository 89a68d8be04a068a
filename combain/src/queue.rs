//! Thread-safe FIFO queues linking the control thread and the HTTP worker.
//!
//! Two one-directional queues carry all cross-thread traffic:
//!
//! ```text
//! control thread ──OutboundJob──► OutboundQueue ──► HttpWorker
//! control thread ◄─CompletedJob── InboundQueue  ◄── HttpWorker
//! ```
//!
//! Locking is internal; callers only push and pop. Both queues are created
//! once at startup and injected into the registry, worker and correlator.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::registry::RequestHandle;

/// A frozen request waiting for the HTTP worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundJob {
    pub handle: RequestHandle,
    /// JSON request body.
    pub body: String,
}

/// The worker's raw response for one job.
///
/// An empty `body` means the transport failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedJob {
    pub handle: RequestHandle,
    pub body: String,
}

/// Control thread → worker.
pub type OutboundQueue = JobQueue<OutboundJob>;

/// Worker → control thread.
pub type InboundQueue = JobQueue<CompletedJob>;

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Unbounded FIFO with blocking and non-blocking consumers.
///
/// Once closed, pushes are rejected and blocked consumers wake up. Items
/// already queued can still be popped.
pub struct JobQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

impl<T> JobQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Creates a queue already wrapped for sharing between threads.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Appends an item, waking one blocked consumer.
    ///
    /// Returns the item back if the queue has been closed.
    pub fn push(&self, item: T) -> Result<(), T> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(item);
        }
        state.items.push_back(item);
        drop(state);

        self.available.notify_one();
        Ok(())
    }

    /// Removes the oldest item without waiting.
    pub fn try_pop(&self) -> Option<T> {
        self.state.lock().items.pop_front()
    }

    /// Removes the oldest item, waiting while the queue is empty.
    ///
    /// Returns `None` only when the queue is closed and empty.
    pub fn pop_blocking(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    /// Removes every queued item in FIFO order.
    pub fn drain(&self) -> Vec<T> {
        self.state.lock().items.drain(..).collect()
    }

    /// Rejects further pushes and wakes all blocked consumers.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }
}

impl<T> Default for JobQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for JobQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("JobQueue")
            .field("len", &state.items.len())
            .field("closed", &state.closed)
            .finish()
    }
}
