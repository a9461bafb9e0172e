//! Unified error handling
//!
//! Provides the application-level error type and response structures:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API error/response envelope
//!
//! # Error code scheme
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E2xxx | Authorization | E2001 insufficient role |
//! | E3xxx | Authentication | E3001 no credential, E3002 bad token |
//! | E0xxx | Request/business | E0002 validation, E0003 not found |
//! | E9xxx | System | E9001 internal, E9002 database |
//!
//! All authentication and authorization failures are terminal for the
//! request; nothing here retries. 5xx detail stays in the server log and is
//! never echoed back to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Error response body
///
/// ```json
/// {
///   "code": "E3001",
///   "message": "Authentication required"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse {
    /// Stable error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

/// Application error enum
///
/// Taxonomy of the request pipeline: no credential, bad/expired token,
/// identity that no longer resolves, insufficient role, then the ordinary
/// request and system errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication errors (401) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    /// Token verified but the subject no longer exists in the store
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid email or password")]
    InvalidCredentials,

    // ========== Authorization errors (403) ==========
    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Business errors (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== System errors (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", "Authentication required"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E3002", "Invalid token"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", "Token expired"),
            AppError::UserNotFound => (StatusCode::UNAUTHORIZED, "E3004", "User not found"),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "E3005",
                "Invalid email or password",
            ),

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.as_str()),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),

            // Database errors (500) - detail logged, not leaked
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }

            // Internal errors (500) - detail logged, not leaked
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse {
            code: code.to_string(),
            message: message.to_string(),
        });

        (status, body).into_response()
    }
}

impl AppError {
    /// Unified bad-credentials error for login
    ///
    /// The same message is returned whether the email is unknown or the
    /// password is wrong, to prevent account enumeration.
    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
