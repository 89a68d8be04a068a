//! Combain - WiFi and cell tower geolocation client
//!
//! This library collects radio-environment observations (visible WiFi access
//! points and the serving cell), submits them as JSON to the Combain
//! positioning service, and reports the outcome asynchronously to whoever
//! created the request.
//!
//! # Architecture
//!
//! - [`registry`] owns every request and enforces per-session ownership
//! - [`request`] builds the JSON body and classifies response text
//! - [`worker`] performs HTTP calls one at a time on a dedicated thread
//! - [`correlator`] routes each response back to its request on the control
//!   thread and fires the completion callback
//! - [`service`] wires the above together
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
//! let handle = service.registry_mut().create(session);
//! ```

pub mod config;
pub mod correlator;
pub mod logging;
pub mod queue;
pub mod registry;
pub mod request;
pub mod scan;
pub mod service;
pub mod worker;

pub use registry::{RequestHandle, RequestRegistry, SessionId};
pub use request::ResultKind;
pub use service::{LocationService, ServiceError};
