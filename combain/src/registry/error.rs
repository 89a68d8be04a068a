//! Registry error types.

use thiserror::Error;

use super::RequestHandle;
use crate::scan::ValidationError;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Synchronous failures of the registry's public operations.
///
/// These never reach the completion callback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Malformed scan item or empty request.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Unknown handle, or one owned by another session.
    #[error("Location request not found: {0}")]
    NotFound(RequestHandle),

    /// The request has already been submitted.
    #[error("Location request {handle} is busy (state: {state})")]
    Busy {
        handle: RequestHandle,
        state: &'static str,
    },

    /// The HTTP worker has stopped accepting jobs.
    #[error("Cannot submit {0}: service is shutting down")]
    ShuttingDown(RequestHandle),
}
