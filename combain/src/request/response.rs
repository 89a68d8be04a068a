//! Positioning service response schemas and classification.
//!
//! The worker hands back raw response text; [`classify`] turns it into exactly
//! one [`ResponseOutcome`]:
//!
//! ```text
//! ""  ──────────────────────────────► CommunicationFailure
//! not JSON ─────────────────────────► ParseFailure { raw }
//! {"location":{..},"accuracy":..} ──► Success
//! {"error":{"code":..,..}} ─────────► Error
//! any other JSON ───────────────────► ParseFailure { raw }
//! ```

use serde::Deserialize;

use super::state::ResultKind;

/// Position returned by the service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuccessResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: f64,
}

/// One entry of the service's error list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceErrorDetail {
    pub domain: String,
    pub reason: String,
    pub message: String,
}

/// Error returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub errors: Vec<ServiceErrorDetail>,
    pub code: u16,
    pub message: String,
}

impl ErrorResponse {
    /// The first reported error, if the service sent any details.
    pub fn first_error(&self) -> Option<&ServiceErrorDetail> {
        self.errors.first()
    }
}

/// Classified result of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    Success(SuccessResponse),
    Error(ErrorResponse),
    /// Payload was not JSON or matched no known schema; holds the raw text.
    ParseFailure(String),
    /// The transport produced no response body.
    CommunicationFailure,
}

impl ResponseOutcome {
    pub fn kind(&self) -> ResultKind {
        match self {
            ResponseOutcome::Success(_) => ResultKind::Success,
            ResponseOutcome::Error(_) => ResultKind::Error,
            ResponseOutcome::ParseFailure(_) => ResultKind::ParseFailure,
            ResponseOutcome::CommunicationFailure => ResultKind::CommunicationFailure,
        }
    }
}

#[derive(Deserialize)]
struct SuccessBody {
    location: LocationBody,
    accuracy: f64,
}

#[derive(Deserialize)]
struct LocationBody {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ServiceErrorDetail>,
    code: u16,
    message: String,
}

/// Classifies a raw response body.
///
/// An empty body is the worker's marker for a transport failure and is
/// checked before any parsing is attempted.
pub fn classify(raw: &str) -> ResponseOutcome {
    if raw.is_empty() {
        return ResponseOutcome::CommunicationFailure;
    }

    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return ResponseOutcome::ParseFailure(raw.to_string()),
    };

    if let Ok(body) = SuccessBody::deserialize(&value) {
        return ResponseOutcome::Success(SuccessResponse {
            latitude: body.location.lat,
            longitude: body.location.lng,
            accuracy_meters: body.accuracy,
        });
    }

    if let Ok(envelope) = ErrorEnvelope::deserialize(&value) {
        let ErrorBody {
            errors,
            code,
            message,
        } = envelope.error;
        return ResponseOutcome::Error(ErrorResponse {
            errors,
            code,
            message,
        });
    }

    ResponseOutcome::ParseFailure(raw.to_string())
}
