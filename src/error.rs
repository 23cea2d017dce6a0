use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::routes::timestamp;
use crate::store::StoreError;

/// Unified application error type that maps to JSON HTTP responses.
///
/// Every error body has the envelope shape
/// `{ "success": false, "error": "...", "message": "...", "timestamp": "..." }`,
/// plus `errors` for validation failures and `details` for internal errors in development.
#[derive(Debug)]
pub enum AppError {
    /// 400 Bad Request
    BadRequest(String),
    /// 400 Bad Request carrying every validation failure
    Validation(Vec<String>),
    /// 404 Not Found
    NotFound(String),
    /// 500 Internal Server Error; `details` is only populated when the environment allows it
    Internal {
        message: String,
        details: Option<String>,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    timestamp: String,
}

impl AppError {
    /// Translate a store failure for the operation described by `context`
    /// (e.g. `"Failed to retrieve games"`).
    #[must_use]
    pub fn from_store(err: StoreError, context: &str, expose_details: bool) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(format!("Game not found with ID: {id}")),
            StoreError::InvalidId(raw) => {
                Self::BadRequest(format!("Invalid game ID format: {raw}"))
            }
            StoreError::ConstraintViolation(msg) => {
                Self::BadRequest(format!("Constraint violation: {msg}"))
            }
            err @ StoreError::Backend(_) => Self::Internal {
                message: context.to_string(),
                details: expose_details.then(|| err.to_string()),
            },
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, errors, details) = match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => (msg, None, None),
            Self::Validation(errors) => ("Validation failed".to_string(), Some(errors), None),
            Self::Internal { message, details } => {
                tracing::error!(details = ?details, "Internal server error: {message}");
                (message, None, details)
            }
        };

        let body = ErrorBody {
            success: false,
            error: status.canonical_reason().unwrap_or("Error"),
            message,
            errors,
            details,
            timestamp: timestamp(),
        };

        (status, Json(body)).into_response()
    }
}
