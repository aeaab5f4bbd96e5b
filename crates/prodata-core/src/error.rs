//! Error types for ProData API operations.
//!
//! Every failure surfaced by the transport or the entity clients maps onto one
//! variant of [`Error`], so callers can decide which failures are fatal.

use crate::envelope::ApiErrorDetail;
use serde::Serialize;
use thiserror::Error;

/// Message used when the API reports failure without any error entries.
pub const UNKNOWN_API_ERROR: &str = "unknown error";

/// Main error type for ProData operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Caller-supplied input violates a precondition
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encoding(String),

    /// Network-level failure (DNS, connection, timeout, body read)
    #[error("Request failed: {0}")]
    Transport(String),

    /// Response is not a valid envelope or carries unexpected data
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Well-formed envelope reporting `success=false`
    #[error("API error: {0}")]
    Api(ApiError),

    /// Invalid or incomplete client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Specialized result type for ProData operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error reported by the API inside a failed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// HTTP status code of the response carrying the envelope
    pub status: u16,
    /// Raw error entries as returned by the server
    pub errors: Vec<ApiErrorDetail>,
    /// Entries formatted as `[code] message` joined with `"; "`
    pub message: String,
}

impl ApiError {
    /// Build an API error from the server's error entries.
    #[must_use]
    pub fn new(status: u16, errors: Vec<ApiErrorDetail>) -> Self {
        let message = format_api_errors(&errors);
        Self {
            status,
            errors,
            message,
        }
    }

    /// Returns true if the server reported that the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == 404 || self.errors.iter().any(|e| e.code == 404)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Join error entries into a single message.
#[must_use]
pub fn format_api_errors(errors: &[ApiErrorDetail]) -> String {
    if errors.is_empty() {
        return UNKNOWN_API_ERROR.to_string();
    }
    errors
        .iter()
        .map(|e| format!("[{}] {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Encoding(_) => "ENCODING_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Api(_) => "API_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Returns the API error payload, if this is an API error.
    #[must_use]
    pub const fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns true if the API reported that the target resource is gone.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.as_api_error().is_some_and(ApiError::is_not_found)
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {err}"))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Config(err.to_string())
    }
}
