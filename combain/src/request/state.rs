//! Per-request lifecycle state.
//!
//! ```text
//! Unsubmitted ──submit──► Submitted ──response──► Success
//!                                              ├─► Error
//!                                              ├─► ParseFailure
//!                                              └─► CommunicationFailure
//! ```
//!
//! Transitions are one-way. Destruction is handled by the registry and is
//! valid from any state.

use std::fmt;

use super::response::{ErrorResponse, ResponseOutcome, SuccessResponse};

/// Tag passed to the completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Success,
    Error,
    ParseFailure,
    CommunicationFailure,
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultKind::Success => "success",
            ResultKind::Error => "error",
            ResultKind::ParseFailure => "parse_failure",
            ResultKind::CommunicationFailure => "communication_failure",
        };
        f.write_str(name)
    }
}

/// Where a request is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    /// Accepting scan items.
    #[default]
    Unsubmitted,
    /// Frozen and queued for (or in) the HTTP worker.
    Submitted,
    Success(SuccessResponse),
    Error(ErrorResponse),
    ParseFailure {
        raw: String,
    },
    CommunicationFailure,
}

impl RequestState {
    /// Short name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            RequestState::Unsubmitted => "unsubmitted",
            RequestState::Submitted => "submitted",
            RequestState::Success(_) => "success",
            RequestState::Error(_) => "error",
            RequestState::ParseFailure { .. } => "parse_failure",
            RequestState::CommunicationFailure => "communication_failure",
        }
    }
}

impl From<ResponseOutcome> for RequestState {
    fn from(outcome: ResponseOutcome) -> Self {
        match outcome {
            ResponseOutcome::Success(success) => RequestState::Success(success),
            ResponseOutcome::Error(error) => RequestState::Error(error),
            ResponseOutcome::ParseFailure(raw) => RequestState::ParseFailure { raw },
            ResponseOutcome::CommunicationFailure => RequestState::CommunicationFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_unsubmitted() {
        assert_eq!(RequestState::default(), RequestState::Unsubmitted);
        assert_eq!(RequestState::Submitted.name(), "submitted");
    }

    #[test]
    fn test_outcome_maps_to_terminal_state() {
        let state = RequestState::from(ResponseOutcome::ParseFailure("oops".into()));
        assert_eq!(state, RequestState::ParseFailure { raw: "oops".into() });
        assert_eq!(state.name(), "parse_failure");

        let state = RequestState::from(ResponseOutcome::CommunicationFailure);
        assert_eq!(state, RequestState::CommunicationFailure);
    }

    #[test]
    fn test_result_kind_display() {
        assert_eq!(ResultKind::CommunicationFailure.to_string(), "communication_failure");
        assert_eq!(ResultKind::Success.to_string(), "success");
    }
}
