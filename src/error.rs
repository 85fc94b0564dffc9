//! Error types for the store and the HTTP layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use thiserror::Error;

use crate::types::TaskId;

/// Errors returned by [`TaskStore`](crate::store::TaskStore) implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field is missing or empty.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// No task has the given id.
    #[error("Todo not found: {0}")]
    NotFound(TaskId),

    /// The underlying SQLite call failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The store could not be reached (poisoned lock, failed migration).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn missing_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn unavailable(err: impl fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Error categories, used to pick the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // 400
    MissingRequiredField,
    InvalidBody,

    // 404
    TodoNotFound,

    // 500
    DatabaseError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::MissingRequiredField | ErrorCode::InvalidBody => StatusCode::BAD_REQUEST,
            ErrorCode::TodoNotFound => StatusCode::NOT_FOUND,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error returned by the HTTP handlers.
///
/// Serialized as `{"error": message}`; store internals never reach the body.
#[derive(Debug)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

/// Message for every 404 the API returns.
pub const NOT_FOUND_MESSAGE: &str = "Todo not found";

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(ErrorCode::TodoNotFound, NOT_FOUND_MESSAGE)
    }

    pub fn invalid_body(reason: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidBody, format!("Invalid request body: {}", reason))
    }

    /// Map a store failure to a response error.
    ///
    /// `failure` is the static message used for 500s; the underlying error
    /// is logged here and dropped.
    pub fn from_store(err: StoreError, failure: &'static str) -> Self {
        match err {
            StoreError::Validation { message, .. } => {
                Self::new(ErrorCode::MissingRequiredField, message)
            }
            StoreError::NotFound(_) => Self::not_found(),
            other => {
                tracing::error!(error = %other, "{}", failure);
                Self::new(ErrorCode::DatabaseError, failure)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status(), body).into_response()
    }
}
