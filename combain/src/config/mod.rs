//! Service configuration.
//!
//! [`ServiceConfig`] is what the library consumes; [`ConfigFile`] loads user
//! settings from `~/.combain/config.ini` and converts them.

mod file;

use std::time::Duration;

use crate::worker::{WorkerConfig, DEFAULT_RECEIVE_CAPACITY, DEFAULT_TIMEOUT_SECS};

pub use file::{config_directory, config_file_path, ConfigFile, ConfigFileError};

/// Default positioning service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://cps.combain.com";

/// Configuration for a [`LocationService`](crate::service::LocationService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URL of the positioning service.
    pub endpoint: String,

    /// API key for the positioning service.
    pub api_key: String,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Receive buffer capacity in bytes.
    pub receive_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            receive_capacity: DEFAULT_RECEIVE_CAPACITY,
        }
    }
}

impl ServiceConfig {
    /// Create a configuration with the given API key and defaults otherwise.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the service endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the receive buffer capacity.
    pub fn with_receive_capacity(mut self, capacity: usize) -> Self {
        self.receive_capacity = capacity;
        self
    }

    /// Settings handed to the HTTP worker.
    pub(crate) fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            receive_capacity: self.receive_capacity,
        }
    }
}
