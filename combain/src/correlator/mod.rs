//! Routes worker responses back to their originating requests.
//!
//! The correlator runs on the control thread. When the worker raises the
//! [`ResponseSignal`], the control loop calls [`ResponseCorrelator::drain`],
//! which for every queued response:
//!
//! 1. Classifies the raw body ([`classify`])
//! 2. Records the terminal state in the registry
//! 3. Invokes the stored completion callback exactly once
//!
//! Responses for handles that were destroyed (or whose session closed) while
//! the HTTP call was in flight are dropped silently.

mod signal;

use std::sync::Arc;

use tracing::debug;

use crate::queue::{CompletedJob, InboundQueue};
use crate::registry::RequestRegistry;
use crate::request::classify;

pub use signal::ResponseSignal;

/// Consumes completed jobs and dispatches completion callbacks.
#[derive(Debug, Clone)]
pub struct ResponseCorrelator {
    inbound: Arc<InboundQueue>,
    signal: ResponseSignal,
}

impl ResponseCorrelator {
    pub fn new(inbound: Arc<InboundQueue>, signal: ResponseSignal) -> Self {
        Self { inbound, signal }
    }

    /// Processes every queued response. Returns the number of callbacks invoked.
    pub fn drain(&self, registry: &mut RequestRegistry) -> usize {
        let mut dispatched = 0;

        while let Some(CompletedJob { handle, body }) = self.inbound.try_pop() {
            let outcome = classify(&body);
            debug!(%handle, kind = %outcome.kind(), bytes = body.len(), "Correlating response");

            if let Some((callback, kind)) = registry.complete(handle, outcome) {
                callback(&*registry, handle, kind);
                dispatched += 1;
            }
        }

        dispatched
    }

    /// Waits for the worker's wake signal.
    pub async fn wait(&self) {
        self.signal.notified().await;
    }

    /// Responses waiting to be drained.
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }
}
