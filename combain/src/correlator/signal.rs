//! Wake-up signal from the worker to the control thread.

use std::sync::Arc;

use tokio::sync::Notify;

/// Edge-triggered "responses are available" notification.
///
/// Carries no data; the inbound queue is the source of truth. Signals raised
/// while nobody is waiting collapse into a single stored permit, so the next
/// wait returns immediately and one drain picks up every queued response.
#[derive(Debug, Clone, Default)]
pub struct ResponseSignal {
    notify: Arc<Notify>,
}

impl ResponseSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wakes the control thread. Safe to call from any thread.
    pub fn notify(&self) {
        self.notify.notify_one();
    }

    /// Waits until [`notify`](Self::notify) has been called.
    pub async fn notified(&self) {
        self.notify.notified().await;
    }
}
