//! Error types for the catalog server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error codes reported in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 3,
    NoSuchData = 20,
    Duplicate = 8,
    BadValue = 18,
    InvalidIdentifier = 22,
    NotConfigured = 23,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed identifier in a path parameter or body reference
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// One or more field-level problems
    #[error("Validation error: {message}")]
    Validation { message: String, errors: Vec<String> },

    #[error("Not found: {0}")]
    NotFound(String),

    /// Referential-integrity or uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure carrying every collected field error
    pub fn validation_failed(errors: Vec<String>) -> Self {
        AppError::Validation {
            message: "Validation failed".to_string(),
            errors,
        }
    }

    /// Validation-class failure with a single message and no field list
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// A book references an author that does not exist
    pub fn unknown_author() -> Self {
        AppError::validation("Author not found")
    }

    pub fn isbn_taken() -> Self {
        AppError::Conflict("ISBN already exists".to_string())
    }

    pub fn author_has_books() -> Self {
        AppError::Conflict("Cannot delete author with existing books".to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Every field-level problem, present on validation failures
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, errors) = match self {
            AppError::InvalidId(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidIdentifier, msg, Vec::new())
            }
            AppError::Validation { message, errors } => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, message, errors)
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg, Vec::new())
            }
            // Integrity violations are client errors on this API, not 409s
            AppError::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::Duplicate, msg, Vec::new())
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg, Vec::new())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                    Vec::new(),
                )
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::NotConfigured,
                    msg,
                    Vec::new(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                    Vec::new(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            errors,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
