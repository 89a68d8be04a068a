//! Final result of a CLI location request and how it is reported.

use std::io::{self, Write};

use combain::registry::{RequestHandle, RequestRegistry, SessionId};
use combain::request::{ErrorResponse, ResultKind, SuccessResponse};

/// What the completion callback found in the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationOutcome {
    Success(SuccessResponse),
    Error(ErrorResponse),
    ParseFailure(String),
    CommunicationFailure,
    /// Notified with `kind`, but the registry had no matching result.
    Unavailable(ResultKind),
}

impl LocationOutcome {
    /// Read the result for `handle` out of the registry.
    pub fn collect(
        registry: &RequestRegistry,
        session: SessionId,
        handle: RequestHandle,
        kind: ResultKind,
    ) -> Self {
        let outcome = match kind {
            ResultKind::Success => registry
                .success_response(session, handle)
                .map(LocationOutcome::Success),
            ResultKind::Error => registry
                .error_response(session, handle)
                .map(|e| LocationOutcome::Error(e.clone())),
            ResultKind::ParseFailure => registry
                .parse_failure(session, handle)
                .map(|raw| LocationOutcome::ParseFailure(raw.to_string())),
            ResultKind::CommunicationFailure => Ok(LocationOutcome::CommunicationFailure),
        };
        outcome.unwrap_or(LocationOutcome::Unavailable(kind))
    }

    /// Process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            LocationOutcome::Success(_) => 0,
            _ => 1,
        }
    }

    /// Print the location to `out`, or the failure to `err`.
    pub fn report(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        match self {
            LocationOutcome::Success(position) => {
                writeln!(out, "Location")?;
                writeln!(
                    out,
                    "  latitude={:.6}, longitude={:.6}, accuracy={:.6} meters",
                    position.latitude, position.longitude, position.accuracy_meters
                )
            }
            LocationOutcome::Error(error) => {
                let (domain, reason, message) = error
                    .first_error()
                    .map(|e| (e.domain.as_str(), e.reason.as_str(), e.message.as_str()))
                    .unwrap_or_default();
                writeln!(err, "Received an error response.")?;
                writeln!(err, "  firstDomain: {}", domain)?;
                writeln!(err, "  firstReason: {}", reason)?;
                writeln!(err, "  firstMessage: {}", message)?;
                writeln!(err, "  code: {}", error.code)?;
                writeln!(err, "  message: {}", error.message)
            }
            LocationOutcome::ParseFailure(raw) => {
                writeln!(err, "Received a result which couldn't be parsed \"{}\"", raw)
            }
            LocationOutcome::CommunicationFailure => {
                writeln!(err, "Couldn't communicate with Combain server")
            }
            LocationOutcome::Unavailable(kind) => writeln!(
                err,
                "Received result notification of type {}, but couldn't fetch the result.",
                kind
            ),
        }
    }
}
