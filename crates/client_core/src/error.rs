//! Failure taxonomy for the prediction client.

use std::time::Duration;

use shared::domain::FormField;
use thiserror::Error;

/// A form that cannot be submitted yet. The controller treats these as no-ops.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("required field `{0}` is empty")]
    Missing(FormField),
    #[error("field `{field}` has malformed value {value:?}")]
    Malformed { field: FormField, value: String },
    #[error("field `{field}` value {value:?} is out of range")]
    OutOfRange { field: FormField, value: String },
}

impl ValidationError {
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::Missing(field)
            | ValidationError::Malformed { field, .. }
            | ValidationError::OutOfRange { field, .. } => *field,
        }
    }
}

/// A failed exchange with the prediction service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("prediction service returned HTTP {status}: {detail}")]
    Request { status: u16, detail: String },
    #[error("prediction service unreachable: {0}")]
    Network(String),
    #[error("malformed response payload: {0}")]
    Payload(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

impl ServiceError {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Request { .. } => "request",
            ServiceError::Network(_) => "network",
            ServiceError::Payload(_) => "payload",
            ServiceError::Timeout(_) => "timeout",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text shown to the user while the submission sits in `Failed`.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Request { status, .. } if *status >= 500 => format!(
                "The prediction service failed to produce an estimate (HTTP {status}). Please try again."
            ),
            ServiceError::Request { status, .. } => format!(
                "The prediction service rejected the request (HTTP {status}). Check the form and try again."
            ),
            ServiceError::Network(_) | ServiceError::Timeout(_) => {
                "Could not reach the prediction service. Check your connection and try again."
                    .to_string()
            }
            ServiceError::Payload(_) => {
                "The prediction service returned an unexpected response.".to_string()
            }
        }
    }
}

/// The location list could not be fetched; recovered by leaving the set empty.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to load location names: {0}")]
pub struct ReferenceLoadError(#[from] pub ServiceError);
