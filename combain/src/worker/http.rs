//! HTTP transport abstraction for testability

use std::io::Read;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::debug;

use super::buffer::ReceiveBuffer;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const READ_CHUNK_SIZE: usize = 4096;

/// Transport-level failures. The worker turns these into an empty response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response: {0}")]
    Body(String),
}

/// Trait for HTTP POST operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock transports in tests.
pub trait HttpTransport: Send + 'static {
    /// Posts a JSON body and reads the response into `buffer`.
    ///
    /// Any HTTP status counts as a response: the service reports errors as
    /// JSON bodies on 4xx statuses.
    ///
    /// # Returns
    ///
    /// The HTTP status code, or an error if no response was received.
    fn post_json(
        &self,
        url: &str,
        body: &str,
        buffer: &mut ReceiveBuffer,
    ) -> Result<u16, TransportError>;
}

/// Real HTTP transport using reqwest.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a custom timeout.
    ///
    /// Must not be called from within an async runtime; the worker builds
    /// its transport on its own thread.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        Self::from_builder(reqwest::blocking::Client::builder().timeout(timeout))
    }

    fn from_builder(builder: reqwest::blocking::ClientBuilder) -> Result<Self, TransportError> {
        let client = builder
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json(
        &self,
        url: &str,
        body: &str,
        buffer: &mut ReceiveBuffer,
    ) -> Result<u16, TransportError> {
        let mut response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_owned())
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        debug!(status, "Received HTTP response");

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            let read = response
                .read(&mut chunk)
                .map_err(|e| TransportError::Body(e.to_string()))?;
            if read == 0 {
                break;
            }
            // Stop reading once the buffer overflows; the rest is discarded
            if buffer.extend(&chunk[..read]) < read {
                break;
            }
        }

        Ok(status)
    }
}
