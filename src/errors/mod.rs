//! Error handling module for the news portal backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const UNAVAILABLE: &str = "UNAVAILABLE";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Pagination or id argument out of the allowed range
    InvalidArgument(String),
    /// Resource not found
    NotFound(String),
    /// Storage call failed; the message carries operation context
    Storage(String),
    /// Malformed request parameters
    BadRequest(String),
    /// Startup configuration could not be loaded
    Config(String),
    /// Dependency not ready to serve
    Unavailable(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Wrap a database error with the operation that produced it.
    pub fn storage(context: impl std::fmt::Display, err: sqlx::Error) -> Self {
        tracing::error!(error = ?err, "{context} failed");
        AppError::Storage(format!("{context}: {err}"))
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => codes::INVALID_ARGUMENT,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Config(_) => codes::CONFIG_ERROR,
            AppError::Unavailable(_) => codes::UNAVAILABLE,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::InvalidArgument(msg)
            | AppError::NotFound(msg)
            | AppError::Storage(msg)
            | AppError::BadRequest(msg)
            | AppError::Config(msg)
            | AppError::Unavailable(msg)
            | AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Message safe to hand to a client. Storage and internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Storage(_) | AppError::Internal(_) | AppError::Config(_) => {
                "internal error".to_string()
            }
            _ => self.message(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.public_message(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        (status, Json(ErrorResponse::new(&self))).into_response()
    }
}
