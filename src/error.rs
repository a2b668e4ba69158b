//! Handler error type and its translation into HTTP responses.
//!
//! Handlers return `Result<_, ServerError>`; axum turns the error half into
//! a status code plus a plain-text message via [`IntoResponse`]. Anything
//! that is not explicitly classified becomes a 500 whose details only go to
//! the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;

use crate::auth::password::PasswordError;
use crate::auth::token::TokenError;
use crate::db::DbLockError;

/// Error to return in the server response.
#[derive(Debug)]
pub struct ServerError {
    pub status: StatusCode,
    /// Message sent to the client
    pub message: String,
    /// Underlying cause, logged but never sent
    pub source: Option<String>,
}

impl ServerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// A 500 with a generic client message and `source` kept for the log.
    pub fn internal(source: impl fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: reason(StatusCode::INTERNAL_SERVER_ERROR).to_string(),
            source: Some(source.to_string()),
        }
    }
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): ", self.status.as_u16(), reason(self.status))?;
        match &self.source {
            Some(source) => write!(f, "{}", source),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ServerError {}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                "returning {} ({}) for error {}",
                self.status.as_u16(),
                reason(self.status),
                self
            );
        } else {
            tracing::debug!(
                "returning {} ({}) for error {}",
                self.status.as_u16(),
                reason(self.status),
                self
            );
        }
        (self.status, self.message).into_response()
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(err: rusqlite::Error) -> Self {
        Self::internal(format!("database error: {}", err))
    }
}

impl From<DbLockError> for ServerError {
    fn from(err: DbLockError) -> Self {
        Self::internal(err)
    }
}

impl From<TokenError> for ServerError {
    fn from(err: TokenError) -> Self {
        Self::internal(err)
    }
}

impl From<PasswordError> for ServerError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Empty => Self::bad_request(err.to_string()),
            PasswordError::Hash(_) => Self::internal(err),
        }
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("json error: {}", err))
    }
}

impl From<askama::Error> for ServerError {
    fn from(err: askama::Error) -> Self {
        Self::internal(format!("template error: {}", err))
    }
}
