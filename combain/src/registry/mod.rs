//! Handle-based registry of live location requests.
//!
//! The registry owns every request created through it. Requests are addressed
//! by an opaque [`RequestHandle`] and belong to the [`SessionId`] that created
//! them; a handle presented by any other session is treated as unknown.
//!
//! The registry lives on the control thread. Its only link to the HTTP worker
//! is the injected [`OutboundQueue`]; responses come back through
//! [`ResponseCorrelator`](crate::correlator::ResponseCorrelator), which calls
//! [`RequestRegistry::complete`].
//!
//! # Example
//!
//! ```
//! use combain::queue::JobQueue;
//! use combain::registry::{RequestRegistry, SessionId};
//!
//! let outbound = JobQueue::shared();
//! let mut registry = RequestRegistry::new(outbound.clone());
//! let session = SessionId(1);
//!
//! let handle = registry.create(session);
//! registry
//!     .append_wifi_access_point(session, handle, &[0, 0x11, 0x22, 0x33, 0x44, 0x55], b"test", -67)
//!     .unwrap();
//! registry
//!     .submit(session, handle, |_registry, _handle, kind| println!("done: {}", kind))
//!     .unwrap();
//!
//! assert_eq!(outbound.len(), 1);
//! ```

mod error;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::queue::{OutboundJob, OutboundQueue};
use crate::request::{
    ErrorResponse, RequestBuilder, RequestState, ResponseOutcome, ResultKind, SuccessResponse,
};
use crate::scan::{CellTech, CellTower, ScanItem, ValidationError, WifiAccessPoint};

pub use error::{RegistryError, RegistryResult};

/// Identifies the client session that owns a set of requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Opaque reference to a location request.
///
/// Handles are allocated monotonically and never reused, so a stale handle
/// can't alias a newer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestHandle(u64);

impl fmt::Display for RequestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Completion callback stored at submit time.
///
/// Invoked exactly once, on the control thread, with the registry so the
/// callback can fetch the terminal state through the query accessors.
pub type CompletionCallback = Box<dyn FnOnce(&RequestRegistry, RequestHandle, ResultKind)>;

struct RequestRecord {
    session: SessionId,
    builder: RequestBuilder,
    state: RequestState,
    callback: Option<CompletionCallback>,
}

impl fmt::Debug for RequestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestRecord")
            .field("session", &self.session)
            .field("items", &self.builder.len())
            .field("state", &self.state.name())
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// Owner of all live location requests.
#[derive(Debug)]
pub struct RequestRegistry {
    requests: HashMap<RequestHandle, RequestRecord>,
    next_handle: u64,
    outbound: Arc<OutboundQueue>,
}

impl RequestRegistry {
    /// Creates an empty registry feeding the given outbound queue.
    pub fn new(outbound: Arc<OutboundQueue>) -> Self {
        Self {
            requests: HashMap::new(),
            next_handle: 1,
            outbound,
        }
    }

    /// Registers a new empty request owned by `session`.
    pub fn create(&mut self, session: SessionId) -> RequestHandle {
        let handle = RequestHandle(self.next_handle);
        self.next_handle += 1;

        self.requests.insert(
            handle,
            RequestRecord {
                session,
                builder: RequestBuilder::new(),
                state: RequestState::Unsubmitted,
                callback: None,
            },
        );

        debug!(%handle, %session, "Created location request");
        handle
    }

    /// Validates and appends a WiFi access point observation.
    pub fn append_wifi_access_point(
        &mut self,
        session: SessionId,
        handle: RequestHandle,
        bssid: &[u8],
        ssid: &[u8],
        signal_strength: i16,
    ) -> RegistryResult<()> {
        self.mutable_request(session, handle)?;
        let ap = WifiAccessPoint::new(bssid, ssid, signal_strength).map_err(|e| {
            warn!(%handle, error = %e, "Failed to append AP info");
            e
        })?;
        self.append_item(session, handle, ap)
    }

    /// Validates and appends a serving cell observation.
    #[allow(clippy::too_many_arguments)]
    pub fn append_cell_tower(
        &mut self,
        session: SessionId,
        handle: RequestHandle,
        tech: CellTech,
        mcc: u16,
        mnc: u16,
        lac: u32,
        cell_id: u32,
        signal_strength: i32,
    ) -> RegistryResult<()> {
        self.mutable_request(session, handle)?;
        let tower = CellTower::new(tech, mcc, mnc, lac, cell_id, signal_strength).map_err(|e| {
            warn!(%handle, error = %e, "Failed to append cell tower info");
            e
        })?;
        self.append_item(session, handle, tower)
    }

    /// Appends an already-validated scan item.
    pub fn append_item(
        &mut self,
        session: SessionId,
        handle: RequestHandle,
        item: impl Into<ScanItem>,
    ) -> RegistryResult<()> {
        let record = self.mutable_request(session, handle)?;
        record.builder.append(item);
        Ok(())
    }

    /// Freezes the request and queues it for the HTTP worker.
    ///
    /// Returns immediately; `callback` fires later from
    /// [`ResponseCorrelator::drain`](crate::correlator::ResponseCorrelator::drain).
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] for an unknown or foreign handle
    /// - [`RegistryError::Busy`] if the request was already submitted
    /// - [`RegistryError::Validation`] if the request has no scan items
    /// - [`RegistryError::ShuttingDown`] if the worker no longer accepts jobs
    pub fn submit<F>(
        &mut self,
        session: SessionId,
        handle: RequestHandle,
        callback: F,
    ) -> RegistryResult<()>
    where
        F: FnOnce(&RequestRegistry, RequestHandle, ResultKind) + 'static,
    {
        let record = self.mutable_request(session, handle)?;

        if record.builder.is_empty() {
            return Err(ValidationError::EmptyRequest.into());
        }

        let job = OutboundJob {
            handle,
            body: record.builder.generate_request_body(),
        };
        let items = record.builder.len();

        self.outbound
            .push(job)
            .map_err(|_| RegistryError::ShuttingDown(handle))?;

        // Re-borrow: the push above needed `self.outbound`
        if let Some(record) = self.requests.get_mut(&handle) {
            record.state = RequestState::Submitted;
            record.callback = Some(Box::new(callback));
        }

        info!(%handle, %session, items, "Submitted location request");
        Ok(())
    }

    /// The position, if the request completed successfully.
    pub fn success_response(
        &self,
        session: SessionId,
        handle: RequestHandle,
    ) -> RegistryResult<SuccessResponse> {
        match &self.request(session, handle)?.state {
            RequestState::Success(success) => Ok(*success),
            _ => Err(RegistryError::NotFound(handle)),
        }
    }

    /// The service error, if the request completed with one.
    pub fn error_response(
        &self,
        session: SessionId,
        handle: RequestHandle,
    ) -> RegistryResult<&ErrorResponse> {
        match &self.request(session, handle)?.state {
            RequestState::Error(error) => Ok(error),
            _ => Err(RegistryError::NotFound(handle)),
        }
    }

    /// The verbatim response text, if it could not be parsed.
    pub fn parse_failure(&self, session: SessionId, handle: RequestHandle) -> RegistryResult<&str> {
        match &self.request(session, handle)?.state {
            RequestState::ParseFailure { raw } => Ok(raw),
            _ => Err(RegistryError::NotFound(handle)),
        }
    }

    /// Current lifecycle state of a request.
    pub fn state(
        &self,
        session: SessionId,
        handle: RequestHandle,
    ) -> RegistryResult<&RequestState> {
        Ok(&self.request(session, handle)?.state)
    }

    /// Number of scan items appended to a request.
    pub fn item_count(&self, session: SessionId, handle: RequestHandle) -> RegistryResult<usize> {
        Ok(self.request(session, handle)?.builder.len())
    }

    /// Returns true if `session` owns a live request with this handle.
    pub fn contains(&self, session: SessionId, handle: RequestHandle) -> bool {
        self.request(session, handle).is_ok()
    }

    /// Removes a request regardless of its state.
    ///
    /// Unknown and foreign handles are ignored. A response still in flight for
    /// this handle is dropped on arrival without invoking the callback.
    pub fn destroy(&mut self, session: SessionId, handle: RequestHandle) {
        if self.request(session, handle).is_err() {
            return;
        }
        if let Some(record) = self.requests.remove(&handle) {
            debug!(%handle, %session, state = record.state.name(), "Destroyed location request");
        }
    }

    /// Destroys every request owned by `session`.
    ///
    /// Called when a client session closes. In-flight HTTP calls are left to
    /// finish; their responses are dropped. Returns the number of requests
    /// released.
    pub fn release_session(&mut self, session: SessionId) -> usize {
        let before = self.requests.len();
        self.requests.retain(|_, record| record.session != session);
        let released = before - self.requests.len();

        if released > 0 {
            info!(%session, released, "Released requests for closed session");
        }
        released
    }

    /// Number of live requests across all sessions.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Records the outcome for a submitted request and hands back its callback.
    ///
    /// Returns `None` when the handle is no longer registered (destroyed or
    /// released) or the request is not awaiting a response.
    pub(crate) fn complete(
        &mut self,
        handle: RequestHandle,
        outcome: ResponseOutcome,
    ) -> Option<(CompletionCallback, ResultKind)> {
        let Some(record) = self.requests.get_mut(&handle) else {
            debug!(%handle, "Dropping response for released request");
            return None;
        };

        if record.state != RequestState::Submitted {
            warn!(
                %handle,
                state = record.state.name(),
                "Dropping response for request that is not awaiting one"
            );
            return None;
        }

        let kind = outcome.kind();
        record.state = outcome.into();
        record.callback.take().map(|callback| (callback, kind))
    }

    fn request(&self, session: SessionId, handle: RequestHandle) -> RegistryResult<&RequestRecord> {
        self.requests
            .get(&handle)
            .filter(|record| record.session == session)
            .ok_or(RegistryError::NotFound(handle))
    }

    /// Looks up a request that can still be modified.
    fn mutable_request(
        &mut self,
        session: SessionId,
        handle: RequestHandle,
    ) -> RegistryResult<&mut RequestRecord> {
        let record = self
            .requests
            .get_mut(&handle)
            .filter(|record| record.session == session)
            .ok_or(RegistryError::NotFound(handle))?;

        if record.state != RequestState::Unsubmitted {
            return Err(RegistryError::Busy {
                handle,
                state: record.state.name(),
            });
        }
        Ok(record)
    }
}
