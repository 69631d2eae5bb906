//! Domain error types
//!
//! This module defines the error hierarchy for Vigil.
//! All errors are domain-specific and don't expose third-party types.
//!
//! Field-level parse failures are not errors: a malformed vital
//! sign is an expected input and is represented by [`crate::core::assessment::Vital::Invalid`].

use thiserror::Error;

/// Main Vigil error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum VigilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Errors talking to the patient API
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The assessment run cannot continue
    #[error("Assessment aborted: {0}")]
    AssessmentAborted(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl VigilError {
    /// Returns the underlying API error, if any
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            VigilError::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Patient API errors
///
/// Errors that occur when interacting with the remote assessment service.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// HTTP 429
    #[error("Rate limit exceeded (429): {0}")]
    RateLimited(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Non-retryable failure: 4xx other than 429, or a network-level failure
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The server answered 2xx but the body was not what we expected
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether the retry loop may attempt the request again
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::RateLimited(_) | ApiError::ServerError { .. })
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for VigilError {
    fn from(err: std::io::Error) -> Self {
        VigilError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VigilError {
    fn from(err: serde_json::Error) -> Self {
        VigilError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for VigilError {
    fn from(err: toml::de::Error) -> Self {
        VigilError::Configuration(format!("TOML parse error: {err}"))
    }
}
