//! Errors shown in the notification area.
//!
//! Backend failures and form validation both end up as a toast; this type
//! decides the wording and whether the toast is a warning or an error.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::form::FormError;

/// An error the user should hear about.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// The form cannot be submitted as filled in.
    #[error("{0}")]
    Form(#[from] FormError),
}

impl AppError {
    /// Get a user-friendly message for display.
    ///
    /// Messages reported by the backend are shown as-is.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(e) => match e {
                ApiError::BadRequest(msg) | ApiError::ServerError(msg) => msg.clone(),
                ApiError::NotFound(resource) => {
                    format!("'{}' was not found. Check the backend URL.", resource)
                }
                ApiError::RateLimited => {
                    "Too many requests. Please wait a moment and try again.".to_string()
                }
                ApiError::Network(_) => {
                    "Could not reach the simulation backend. Is it running?".to_string()
                }
                ApiError::InvalidUrl(_) => "Invalid backend URL in configuration.".to_string(),
                ApiError::InvalidResponse(msg) => msg.clone(),
            },
            AppError::Form(e) => e.to_string(),
        }
    }

    /// Check if retrying the same action may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Api(ApiError::RateLimited)
                | AppError::Api(ApiError::Network(_))
                | AppError::Api(ApiError::NotFound(_))
        )
    }
}
