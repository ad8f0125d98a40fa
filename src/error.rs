//! Relay error type
//!
//! Every relay fails with a [`RelayError`]. The status code policy is the same
//! for all of them: client mistakes are 4xx, missing configuration and
//! unexpected failures are 500, and provider failures keep the provider's own
//! status code and structured error body.

use crate::provider::ProviderError;
use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Broad category of a relay failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed client input
    InvalidInput,
    /// Upload above the size ceiling
    PayloadTooLarge,
    /// Server is missing required configuration (API key)
    Configuration,
    /// Provider answered with a non-2xx status
    Upstream,
    /// Anything else
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::PayloadTooLarge => "payload_too_large",
            Self::Configuration => "configuration",
            Self::Upstream => "upstream",
            Self::Internal => "internal",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct RelayError {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub message: String,
    /// Structured provider error, when there is one
    pub raw: Option<Value>,
}

impl RelayError {
    fn new(kind: ErrorKind, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
            raw: None,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, StatusCode::BAD_REQUEST, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::PayloadTooLarge,
            StatusCode::PAYLOAD_TOO_LARGE,
            message,
        )
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Configuration,
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Internal,
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
        )
    }

    pub fn upstream(status: u16, message: impl Into<String>, raw: Option<Value>) -> Self {
        Self {
            kind: ErrorKind::Upstream,
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            message: message.into(),
            raw,
        }
    }

    /// The error every relay returns when no API key is configured
    pub fn missing_credential() -> Self {
        Self::configuration("OpenAI API key not configured")
    }

    /// Translate a provider failure.
    ///
    /// API errors keep their status and structured body. Transport and parse
    /// failures collapse into a 500 carrying `generic_message`.
    pub fn from_provider(err: ProviderError, generic_message: &str) -> Self {
        match err {
            ProviderError::MissingApiKey(_) => Self::missing_credential(),
            ProviderError::ApiError {
                status,
                message,
                detail,
            } => {
                Self::upstream(status, message, detail)
            }
            ProviderError::InvalidRequest(message) => Self::invalid_input(message),
            other => {
                tracing::error!("Unexpected provider failure: {}", other);
                Self::internal(generic_message)
            }
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }
}
