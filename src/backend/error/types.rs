/**
 * Backend Error Types
 *
 * This module defines the error type returned by every HTTP handler. Each
 * variant maps to one HTTP status code.
 *
 * # Error Categories
 *
 * - `NotFound` - a referenced message, user or pending request does not exist
 * - `Conflict` - duplicate contact edge or duplicate identity on creation
 * - `StoreFailure` - the backing store is unavailable; fatal to the request
 * - `HandlerError` - any other request-level failure with an explicit status
 *
 * Interrupted long polls never produce a `BackendError`; they complete with
 * an empty list.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use chatline::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::not_found("message not found");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Referenced entity does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Creation would duplicate an existing entity
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Underlying persistence failed
    #[error("Store failure: {message}")]
    StoreFailure { message: String },

    /// Handler error with an explicit status
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Request validation failed
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn store_failure(message: impl Into<String>) -> Self {
        Self::StoreFailure {
            message: message.into(),
        }
    }

    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `NotFound` - 404 Not Found
    /// - `Conflict` - 409 Conflict
    /// - `StoreFailure` - 500 Internal Server Error
    /// - `HandlerError` - Uses the status code from the error
    /// - `SharedError` - 400 Bad Request
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::StoreFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { message }
            | Self::Conflict { message }
            | Self::StoreFailure { message }
            | Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(err) => err.to_string(),
        }
    }
}

impl From<StoreError> for BackendError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity } => Self::not_found(format!("{entity} not found")),
            StoreError::Conflict { message } => Self::conflict(message),
            StoreError::Failure(message) => {
                tracing::error!("[Store] {}", message);
                Self::store_failure(message)
            }
        }
    }
}
