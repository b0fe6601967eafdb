//! API error types for the simulation service client.

use thiserror::Error;

/// Errors that can occur when talking to the simulation backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the request parameters.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Endpoint not found (usually a wrong base URL).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend or its data provider.
    #[error("Rate limited: please wait before retrying")]
    RateLimited,

    /// Backend failure.
    #[error("Server error: {0}")]
    ServerError(String),

    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The body could not be decoded or lacks required fields.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            400 | 422 => ApiError::BadRequest(context.to_string()),
            404 => ApiError::NotFound(context.to_string()),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(context.to_string()),
            _ => ApiError::ServerError(format!("Unexpected HTTP {}: {}", status, context)),
        }
    }

    /// The message to show next to a failed action.
    ///
    /// Server-reported messages are passed through verbatim.
    pub fn detail(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::ServerError(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
