//! Service error types.

use std::fmt;
use std::io;

use crate::worker::{TransportError, WorkerStartError};

/// Errors that can occur while starting the location service.
#[derive(Debug)]
pub enum ServiceError {
    /// No API key was configured.
    MissingApiKey,

    /// Failed to create the HTTP transport.
    Transport(TransportError),

    /// Failed to spawn the HTTP worker thread.
    WorkerSpawn(io::Error),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::MissingApiKey => {
                write!(f, "No API key configured for the positioning service")
            }
            ServiceError::Transport(e) => write!(f, "Failed to create HTTP transport: {}", e),
            ServiceError::WorkerSpawn(e) => write!(f, "Failed to start HTTP worker: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::MissingApiKey => None,
            ServiceError::Transport(e) => Some(e),
            ServiceError::WorkerSpawn(e) => Some(e),
        }
    }
}

impl From<TransportError> for ServiceError {
    fn from(e: TransportError) -> Self {
        ServiceError::Transport(e)
    }
}

impl From<WorkerStartError> for ServiceError {
    fn from(e: WorkerStartError) -> Self {
        match e {
            WorkerStartError::Spawn(e) => ServiceError::WorkerSpawn(e),
            WorkerStartError::Transport(e) => e.into(),
        }
    }
}
