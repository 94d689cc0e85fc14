//! # Web Error Types
//!
//! Maps database and domain errors onto HTTP responses.
//!
//! ```text
//! DbError::Rejected(CoreError)  ──► 422, message shown as-is
//! ValidationError               ──► CoreError::Validation ──► 422
//! any other DbError             ──► 500, logged, generic message shown
//! ```

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use kasir_core::{CoreError, ValidationError};
use kasir_db::DbError;
use thiserror::Error;

use crate::views;

/// Shown in place of infrastructure error details.
pub const INTERNAL_MESSAGE: &str = "something went wrong while saving, please try again";

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum WebError {
    /// The sale broke a business rule or a form field failed validation.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// The database failed.
    #[error(transparent)]
    Database(DbError),
}

impl From<DbError> for WebError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Rejected(reason) => WebError::Rejected(reason),
            other => WebError::Database(other),
        }
    }
}

impl From<ValidationError> for WebError {
    fn from(err: ValidationError) -> Self {
        WebError::Rejected(CoreError::from(err))
    }
}

impl WebError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WebError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show the cashier. Infrastructure errors are logged here.
    pub fn user_message(&self) -> String {
        match self {
            WebError::Rejected(err) => err.to_string(),
            WebError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                INTERNAL_MESSAGE.to_string()
            }
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = views::layout::error_page(status, &self.user_message());
        (status, Html(body)).into_response()
    }
}

/// Result type for handlers.
pub type WebResult<T> = Result<T, WebError>;
