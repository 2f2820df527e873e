/// Error handling for the web server
///
/// This module provides a unified error type that maps to HTML error pages.
/// Handlers return `Result<T, WebError>`; the error converts into a response
/// with the matching status code and a rendered page.
///
/// Expected failures that the user can fix (validation errors, duplicate
/// titles, wrong passwords) are not errors here: handlers re-render their
/// form instead.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use taskdesk_shared::{auth::password::PasswordError, store::StoreError};

use crate::views;

/// Web result type alias
pub type WebResult<T> = Result<T, WebError>;

/// Unified web error type
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebError {
    /// Status code the error renders with
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            WebError::BadRequest(msg) | WebError::NotFound(msg) => msg,
            WebError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                "Something went wrong on our side. Please try again later.".to_string()
            }
        };

        (status, Html(views::error_page(status, &message))).into_response()
    }
}

/// Convert store errors to web errors
///
/// Handlers check for conflicts they can report on the form first; a
/// conflict reaching this point is still a client problem, not a crash.
impl From<StoreError> for WebError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { field } => {
                WebError::BadRequest(format!("That {} is already in use.", field))
            }
            StoreError::Database(e) => WebError::Internal(format!("Database error: {}", e)),
        }
    }
}

/// Convert password errors to web errors
impl From<PasswordError> for WebError {
    fn from(err: PasswordError) -> Self {
        WebError::Internal(format!("Password operation failed: {}", err))
    }
}
