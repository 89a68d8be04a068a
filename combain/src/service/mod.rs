//! Location service bootstrap and lifecycle management.
//!
//! [`LocationService`] wires the components together at startup so nothing
//! relies on ambient globals:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         LocationService                          │
//! │                                                                  │
//! │  RequestRegistry ──► OutboundQueue ──► HttpWorker (own thread)   │
//! │        ▲                                   │                     │
//! │        │                                   ▼                     │
//! │  ResponseCorrelator ◄── InboundQueue ◄─────┘ + ResponseSignal    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything except the worker runs on the caller's (control) thread.
//!
//! # Example
//!
//! ```ignore
//! use combain::config::ServiceConfig;
//! use combain::registry::SessionId;
//! use combain::service::LocationService;
//!
//! let mut service = LocationService::start_default(&ServiceConfig::new("api-key"))?;
//! let session = SessionId(1);
//!
//! let registry = service.registry_mut();
//! let handle = registry.create(session);
//! registry.append_wifi_access_point(session, handle, &bssid, b"home", -60)?;
//! registry.submit(session, handle, |registry, handle, kind| { /* ... */ })?;
//!
//! // Control loop
//! service.wait_for_responses().await;
//! service.process_responses();
//!
//! service.shutdown();
//! ```

mod error;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ServiceConfig;
use crate::correlator::{ResponseCorrelator, ResponseSignal};
use crate::queue::JobQueue;
use crate::registry::RequestRegistry;
use crate::worker::{HttpTransport, HttpWorker, ReqwestTransport, TransportError, WorkerHandle};

pub use error::ServiceError;

/// A running location service: registry, correlator and HTTP worker.
pub struct LocationService {
    registry: RequestRegistry,
    correlator: ResponseCorrelator,
    worker: WorkerHandle,
}

impl LocationService {
    /// Start the service with the production reqwest transport.
    ///
    /// The client is built on the worker thread, so this may be called from
    /// inside an async runtime.
    pub fn start_default(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let timeout = config.timeout;
        Self::launch(config, move || ReqwestTransport::with_timeout(timeout))
    }

    /// Start the service with a custom transport.
    ///
    /// Creates both queues and the wake signal, injects them into each
    /// component, then spawns the worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the worker thread
    /// cannot be spawned.
    pub fn start<T: HttpTransport>(
        config: &ServiceConfig,
        transport: T,
    ) -> Result<Self, ServiceError> {
        Self::launch(config, move || Ok(transport))
    }

    fn launch<T, F>(config: &ServiceConfig, make_transport: F) -> Result<Self, ServiceError>
    where
        T: HttpTransport,
        F: FnOnce() -> Result<T, TransportError> + Send + 'static,
    {
        if config.api_key.trim().is_empty() {
            return Err(ServiceError::MissingApiKey);
        }

        let outbound = JobQueue::shared();
        let inbound = JobQueue::shared();
        let signal = ResponseSignal::new();

        let registry = RequestRegistry::new(Arc::clone(&outbound));
        let correlator = ResponseCorrelator::new(Arc::clone(&inbound), signal.clone());
        let worker = HttpWorker::spawn_with(
            make_transport,
            config.worker_config(),
            outbound,
            inbound,
            signal,
            CancellationToken::new(),
        )?;

        info!(
            endpoint = %config.endpoint,
            timeout_secs = config.timeout.as_secs(),
            receive_capacity = config.receive_capacity,
            "Location service started"
        );

        Ok(Self {
            registry,
            correlator,
            worker,
        })
    }

    pub fn registry(&self) -> &RequestRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut RequestRegistry {
        &mut self.registry
    }

    /// Drain completed responses and invoke their callbacks.
    ///
    /// Returns the number of callbacks invoked.
    pub fn process_responses(&mut self) -> usize {
        self.correlator.drain(&mut self.registry)
    }

    /// Wait until the worker signals that responses are available.
    pub async fn wait_for_responses(&self) {
        self.correlator.wait().await;
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// An HTTP call already in progress completes first; its response is
    /// never delivered.
    pub fn shutdown(self) {
        info!(
            live_requests = self.registry.len(),
            "Location service shutting down"
        );
        self.worker.shutdown();
        info!("Location service stopped");
    }
}

impl std::fmt::Debug for LocationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationService")
            .field("registry", &self.registry)
            .field("pending_responses", &self.correlator.pending())
            .field("worker", &self.worker)
            .finish()
    }
}
