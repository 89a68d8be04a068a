//! Background HTTP worker.
//!
//! A single dedicated thread drains the outbound queue one job at a time,
//! posts each request body to the positioning service and pushes exactly one
//! [`CompletedJob`] per job onto the inbound queue, then wakes the control
//! thread.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          HttpWorker                          │
//! │                                                              │
//! │  OutboundQueue ──► pop_blocking ──► POST {endpoint}/?key=..  │
//! │                                         │                    │
//! │                          ┌──────────────┴─────────────┐      │
//! │                          │ response          transport│error │
//! │                          ▼                            ▼      │
//! │                   ReceiveBuffer text             empty body  │
//! │                          └──────────────┬─────────────┘      │
//! │                                         ▼                    │
//! │                  InboundQueue.push ──► ResponseSignal.notify │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Per-job failures never stop the loop. There is no cancellation of a job
//! once it has started; shutdown takes effect between jobs.

mod buffer;
mod http;

use std::io;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::correlator::ResponseSignal;
use crate::queue::{CompletedJob, InboundQueue, OutboundJob, OutboundQueue};

pub use buffer::{ReceiveBuffer, DEFAULT_RECEIVE_CAPACITY};
pub use http::{HttpTransport, ReqwestTransport, TransportError, DEFAULT_TIMEOUT_SECS};

#[cfg(test)]
pub use http::tests::{MockTransport, RecordedPost};

/// Name given to the worker thread.
pub const WORKER_THREAD_NAME: &str = "combain-http";

/// Failures while starting the worker thread.
#[derive(Debug, Error)]
pub enum WorkerStartError {
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("Failed to create HTTP transport: {0}")]
    Transport(#[source] TransportError),
}

/// Settings the worker needs for each job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Base URL of the positioning service.
    pub endpoint: String,

    /// API key appended to the endpoint as the `key` query parameter.
    pub api_key: String,

    /// Receive buffer size; longer responses are truncated.
    pub receive_capacity: usize,
}

/// The HTTP worker loop.
///
/// Owns the transport and its end of both queues. Use [`spawn_with`](Self::spawn_with)
/// to run it on its own thread.
pub struct HttpWorker<T: HttpTransport> {
    transport: T,
    config: WorkerConfig,
    outbound: Arc<OutboundQueue>,
    inbound: Arc<InboundQueue>,
    signal: ResponseSignal,
}

impl<T: HttpTransport> HttpWorker<T> {
    pub fn new(
        transport: T,
        config: WorkerConfig,
        outbound: Arc<OutboundQueue>,
        inbound: Arc<InboundQueue>,
        signal: ResponseSignal,
    ) -> Self {
        Self {
            transport,
            config,
            outbound,
            inbound,
            signal,
        }
    }

    /// Full request URL: the endpoint templated with the API key.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/?key={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.api_key
        )
    }

    /// Starts the loop on a dedicated thread, creating the transport there.
    ///
    /// Blocking HTTP clients must not be built or dropped inside an async
    /// runtime, so `make_transport` runs on the worker thread. Returns once
    /// the transport is ready or has failed.
    pub fn spawn_with<F>(
        make_transport: F,
        config: WorkerConfig,
        outbound: Arc<OutboundQueue>,
        inbound: Arc<InboundQueue>,
        signal: ResponseSignal,
        shutdown: CancellationToken,
    ) -> Result<WorkerHandle, WorkerStartError>
    where
        F: FnOnce() -> Result<T, TransportError> + Send + 'static,
    {
        let (ready_tx, ready_rx) = mpsc::channel();
        let queue = Arc::clone(&outbound);
        let token = shutdown.clone();

        let thread = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                let transport = match make_transport() {
                    Ok(transport) => transport,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                HttpWorker::new(transport, config, outbound, inbound, signal).run(token);
            })
            .map_err(WorkerStartError::Spawn)?;

        let mut handle = WorkerHandle {
            thread: Some(thread),
            shutdown,
            outbound: queue,
        };

        let startup = ready_rx.recv().unwrap_or_else(|_| {
            Err(TransportError::ClientBuild(
                "worker thread exited during startup".to_string(),
            ))
        });
        if let Err(e) = startup {
            handle.signal_stop();
            if let Some(thread) = handle.thread.take() {
                let _ = thread.join();
            }
            return Err(WorkerStartError::Transport(e));
        }

        Ok(handle)
    }

    /// Runs until shutdown is signalled or the outbound queue is closed.
    pub fn run(self, shutdown: CancellationToken) {
        info!(endpoint = %self.config.endpoint, "HTTP worker starting");

        while !shutdown.is_cancelled() {
            let Some(job) = self.outbound.pop_blocking() else {
                break;
            };

            if shutdown.is_cancelled() {
                debug!(handle = %job.handle, "Discarding queued job at shutdown");
                break;
            }

            let completed = self.process(job);
            self.deliver(completed);
        }

        let discarded = self.outbound.drain().len();
        if discarded > 0 {
            debug!(discarded, "Discarded queued jobs at shutdown");
        }
        info!("HTTP worker stopped");
    }

    /// Performs one job. Always yields a response; transport failures
    /// produce an empty body.
    pub fn process(&self, job: OutboundJob) -> CompletedJob {
        let OutboundJob { handle, body } = job;
        let url = self.endpoint_url();
        let mut buffer = ReceiveBuffer::new(self.config.receive_capacity);

        debug!(%handle, bytes = body.len(), "Posting location request");

        let body = match self.transport.post_json(&url, &body, &mut buffer) {
            Ok(status) => {
                if buffer.is_truncated() {
                    warn!(
                        %handle,
                        status,
                        capacity = buffer.capacity(),
                        "Response exceeded receive buffer; remainder discarded"
                    );
                }
                debug!(%handle, status, bytes = buffer.len(), "Location request completed");
                buffer.into_text()
            }
            Err(e) => {
                error!(%handle, error = %e, "HTTP transport failed");
                String::new()
            }
        };

        CompletedJob { handle, body }
    }

    fn deliver(&self, completed: CompletedJob) {
        let handle = completed.handle;
        if self.inbound.push(completed).is_err() {
            warn!(%handle, "Inbound queue closed; dropping response");
            return;
        }
        self.signal.notify();
    }
}

/// Handle to a running worker thread.
///
/// Dropping the handle signals shutdown without waiting; call
/// [`shutdown`](Self::shutdown) to also join the thread.
#[derive(Debug)]
pub struct WorkerHandle {
    thread: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
    outbound: Arc<OutboundQueue>,
}

impl WorkerHandle {
    /// Stops the worker and waits for it to exit.
    ///
    /// A job already being processed runs to completion. Jobs still queued
    /// are discarded and further submissions are rejected.
    pub fn shutdown(mut self) {
        self.signal_stop();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("HTTP worker thread panicked");
            }
        }
    }

    pub(crate) fn signal_stop(&self) {
        self.shutdown.cancel();
        self.outbound.close();
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.signal_stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::JobQueue;
    use crate::registry::{RequestRegistry, SessionId};
    use std::time::{Duration, Instant};

    struct Fixture {
        outbound: Arc<OutboundQueue>,
        inbound: Arc<InboundQueue>,
        signal: ResponseSignal,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                outbound: JobQueue::shared(),
                inbound: JobQueue::shared(),
                signal: ResponseSignal::new(),
            }
        }

        fn config(capacity: usize) -> WorkerConfig {
            WorkerConfig {
                endpoint: "https://cps.example.com/".to_string(),
                api_key: "secret".to_string(),
                receive_capacity: capacity,
            }
        }

        fn worker(&self, transport: MockTransport, capacity: usize) -> HttpWorker<MockTransport> {
            HttpWorker::new(
                transport,
                Self::config(capacity),
                Arc::clone(&self.outbound),
                Arc::clone(&self.inbound),
                self.signal.clone(),
            )
        }

        fn spawn<F>(&self, make_transport: F) -> Result<WorkerHandle, WorkerStartError>
        where
            F: FnOnce() -> Result<MockTransport, TransportError> + Send + 'static,
        {
            HttpWorker::spawn_with(
                make_transport,
                Self::config(64),
                Arc::clone(&self.outbound),
                Arc::clone(&self.inbound),
                self.signal.clone(),
                CancellationToken::new(),
            )
        }

        fn wait_for_responses(&self, count: usize) -> Vec<CompletedJob> {
            let deadline = Instant::now() + Duration::from_secs(5);
            let mut received = Vec::new();
            while received.len() < count {
                assert!(Instant::now() < deadline, "worker should answer every job");
                match self.inbound.try_pop() {
                    Some(job) => received.push(job),
                    None => std::thread::sleep(Duration::from_millis(5)),
                }
            }
            received
        }

        /// Real handles come from a registry.
        fn handles(&self, count: usize) -> Vec<crate::registry::RequestHandle> {
            let mut registry = RequestRegistry::new(JobQueue::shared());
            (0..count).map(|_| registry.create(SessionId(1))).collect()
        }
    }

    #[test]
    fn test_endpoint_url_template() {
        let fixture = Fixture::new();
        let worker = fixture.worker(MockTransport::replying("{}"), 64);
        assert_eq!(worker.endpoint_url(), "https://cps.example.com/?key=secret");
    }

    #[test]
    fn test_process_posts_body_and_returns_response() {
        let fixture = Fixture::new();
        let transport = MockTransport::replying(r#"{"accuracy":10}"#);
        let posts = Arc::clone(&transport.posts);
        let worker = fixture.worker(transport, 64);
        let handle = fixture.handles(1)[0];

        let completed = worker.process(OutboundJob {
            handle,
            body: "{\"wifiAccessPoints\":[]}".to_string(),
        });

        assert_eq!(completed.handle, handle);
        assert_eq!(completed.body, r#"{"accuracy":10}"#);
        let posts = posts.lock();
        assert_eq!(posts[0].url, "https://cps.example.com/?key=secret");
        assert_eq!(posts[0].body, "{\"wifiAccessPoints\":[]}");
    }

    #[test]
    fn test_transport_failure_yields_empty_body() {
        let fixture = Fixture::new();
        let worker = fixture.worker(MockTransport::failing(), 64);
        let handle = fixture.handles(1)[0];

        let completed = worker.process(OutboundJob {
            handle,
            body: "{}".to_string(),
        });

        assert_eq!(completed.handle, handle);
        assert!(completed.body.is_empty());
    }

    #[test]
    fn test_oversized_response_is_truncated() {
        let fixture = Fixture::new();
        let worker = fixture.worker(MockTransport::replying("0123456789"), 4);
        let handle = fixture.handles(1)[0];

        let completed = worker.process(OutboundJob {
            handle,
            body: "{}".to_string(),
        });

        assert_eq!(completed.body, "0123");
    }

    #[test]
    fn test_spawned_worker_answers_every_job_in_order() {
        let fixture = Fixture::new();
        let handles = fixture.handles(3);

        let worker = fixture.spawn(|| Ok(MockTransport::replying("{}"))).unwrap();
        for h in &handles {
            fixture
                .outbound
                .push(OutboundJob {
                    handle: *h,
                    body: "{}".to_string(),
                })
                .unwrap();
        }

        let received: Vec<_> = fixture
            .wait_for_responses(handles.len())
            .into_iter()
            .map(|job| job.handle)
            .collect();

        assert_eq!(received, handles);
        worker.shutdown();
    }

    #[test]
    fn test_transport_is_created_on_worker_thread() {
        let fixture = Fixture::new();
        let created_on = Arc::new(parking_lot::Mutex::new(None));
        let sink = Arc::clone(&created_on);

        let worker = fixture
            .spawn(move || {
                *sink.lock() = std::thread::current().name().map(str::to_string);
                Ok(MockTransport::replying("{}"))
            })
            .unwrap();
        worker.shutdown();

        assert_eq!(created_on.lock().as_deref(), Some(WORKER_THREAD_NAME));
    }

    #[test]
    fn test_transport_build_failure_is_reported() {
        let fixture = Fixture::new();

        let result = fixture.spawn(|| Err(TransportError::ClientBuild("no tls".to_string())));

        assert!(matches!(
            result,
            Err(WorkerStartError::Transport(TransportError::ClientBuild(_)))
        ));
        assert!(fixture.outbound.is_closed());
    }

    #[test]
    fn test_shutdown_stops_idle_worker() {
        let fixture = Fixture::new();

        let worker = fixture.spawn(|| Ok(MockTransport::replying("{}"))).unwrap();
        worker.shutdown();

        assert!(fixture.outbound.is_closed());
        assert!(fixture.inbound.is_empty());
    }

    #[test]
    fn test_run_discards_queued_jobs_when_cancelled() {
        let fixture = Fixture::new();
        let worker = fixture.worker(MockTransport::replying("{}"), 64);
        for handle in fixture.handles(2) {
            fixture
                .outbound
                .push(OutboundJob {
                    handle,
                    body: "{}".to_string(),
                })
                .unwrap();
        }

        let token = CancellationToken::new();
        token.cancel();
        worker.run(token);

        // Nothing was processed
        assert!(fixture.outbound.is_empty());
        assert!(fixture.inbound.is_empty());
    }
}
