//! Error type system for tokengate
//!
//! Every failure a request can hit is a `GateError` variant. Each variant maps
//! to a fixed HTTP status and a fixed client-facing message; internal detail
//! only ever reaches the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::TokenError;

/// Message sent for every 5xx response
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Main error type for the service
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    // Credential errors
    #[error("User already exists")]
    DuplicateUser,

    #[error("User not found")]
    UserNotFound,

    #[error("Incorrect password")]
    IncorrectPassword,

    // Token errors
    #[error("No token provided")]
    TokenMissing,

    #[error("Token is invalid or expired")]
    TokenInvalid,

    #[error("Token is invalid or expired")]
    TokenExpired,

    // Internal errors
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssue(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GateError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::DuplicateUser | GateError::UserNotFound => StatusCode::BAD_REQUEST,

            GateError::IncorrectPassword | GateError::TokenMissing => StatusCode::UNAUTHORIZED,

            GateError::TokenInvalid | GateError::TokenExpired => StatusCode::FORBIDDEN,

            GateError::Hashing(_) | GateError::TokenIssue(_) | GateError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error type name used in logs
    pub fn error_type(&self) -> &'static str {
        match self {
            GateError::DuplicateUser => "DuplicateUser",
            GateError::UserNotFound => "UserNotFound",
            GateError::IncorrectPassword => "IncorrectPassword",
            GateError::TokenMissing => "TokenMissing",
            GateError::TokenInvalid => "TokenInvalid",
            GateError::TokenExpired => "TokenExpired",
            GateError::Hashing(_) => "Hashing",
            GateError::TokenIssue(_) => "TokenIssue",
            GateError::Internal(_) => "Internal",
        }
    }

    /// Message safe to return to the caller
    pub fn client_message(&self) -> String {
        if self.status_code().is_server_error() {
            INTERNAL_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<TokenError> for GateError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Missing => GateError::TokenMissing,
            TokenError::Invalid => GateError::TokenInvalid,
            TokenError::Expired => GateError::TokenExpired,
        }
    }
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn from_error(error: &GateError) -> Self {
        Self {
            message: error.client_message(),
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        }

        (status_code, Json(ErrorResponse::from_error(&self))).into_response()
    }
}

/// Result type alias for operations that can fail with GateError
pub type Result<T> = std::result::Result<T, GateError>;
