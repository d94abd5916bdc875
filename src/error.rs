//! Error types for the MOHO server.
//!
//! Uses thiserror for ergonomic error definitions that integrate
//! with axum's response system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Auth errors
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Email already exists")]
    DuplicateEmail,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // External service errors
    #[error("Upstream error: {0}")]
    Upstream(String),

    // Persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 401
            Self::Unauthenticated
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,

            // 404
            Self::NotFound(_) => StatusCode::NOT_FOUND,

            // 400
            Self::DuplicateEmail | Self::Validation(_) => StatusCode::BAD_REQUEST,

            // 500
            Self::Upstream(_) | Self::Storage(_) | Self::Internal(_) | Self::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotFound(_) => "NOT_FOUND",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Other(_) => "UNKNOWN_ERROR",
        }
    }

    /// Message safe to surface to clients. 500-class detail stays server-side.
    fn client_message(&self) -> String {
        match self {
            Self::Upstream(_) => "Failed to get response from AI".to_string(),
            Self::Storage(_) | Self::Internal(_) | Self::Other(_) => "Server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(code, detail = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.client_message(),
            }
        }));

        (status, body).into_response()
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(format!("HTTP request failed: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(format!("JSON error: {}", err))
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Internal(format!("Password hashing failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::Validation("missing field".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(Error::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::NotFound("conversation".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Upstream("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = Error::Upstream("api key leaked in message".into());
        assert_eq!(err.client_message(), "Failed to get response from AI");

        let err = Error::Storage("/var/data/users.json: permission denied".into());
        assert_eq!(err.client_message(), "Server error");
    }
}
