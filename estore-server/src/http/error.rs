//! API error type with IntoResponse
//!
//! Core errors are converted to JSON responses with status codes:
//!
//! | condition | status |
//! |---|---|
//! | validation / malformed body | 400 |
//! | storage constraint violation | 400 |
//! | not found | 404 |
//! | conflict | 409 |
//! | canceled | 499 |
//! | storage backend failure | 502 |

use std::error::Error as _;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::field::display;

use estore_core::{CoreError, StorageError};

use super::validation::ValidationErrors;

/// Non-standard "client closed request".
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Payload or path failed validation (400)
    Validation(ValidationErrors),

    /// Body could not be decoded (400)
    BadRequest { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: i64 },

    /// Business rule violation (409)
    Conflict { reason: String },

    /// Backend rejected the write (400)
    Constraint(StorageError),

    /// Backend failure (502, logged)
    Storage(StorageError),

    /// Deadline passed or caller went away (499)
    Canceled,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } | Self::Constraint(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::Canceled => StatusCode::from_u16(CLIENT_CLOSED_REQUEST)
                .unwrap_or(StatusCode::REQUEST_TIMEOUT),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(errors) => json!({
                "error": "validation_error",
                "message": errors.to_string(),
                "fields": errors.fields(),
            }),
            Self::BadRequest { message } => json!({
                "error": "bad_request",
                "message": message
            }),
            Self::NotFound { resource, id } => json!({
                "error": "not_found",
                "message": format!("{} '{}' not found", resource, id)
            }),
            Self::Conflict { reason } => json!({
                "error": "conflict",
                "message": reason
            }),
            Self::Constraint(e) => {
                tracing::warn!(error = %e, cause = e.source().map(display), "Constraint violation");
                json!({
                    "error": "constraint_violation",
                    "message": "request violates a data constraint (check establishment_id)"
                })
            }
            Self::Storage(e) => {
                // Log the actual error, return generic message
                tracing::error!(error = %e, cause = e.source().map(display), "Storage error");
                json!({
                    "error": "storage_error",
                    "message": "the storage backend failed to complete the request"
                })
            }
            Self::Canceled => json!({
                "error": "canceled",
                "message": "request was canceled before it completed"
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        Self::Validation(e)
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NotFound { resource, id } => Self::NotFound { resource, id },
            CoreError::Conflict { reason } => Self::Conflict { reason },
            CoreError::Storage(e) if e.is_constraint() => Self::Constraint(e),
            CoreError::Storage(e) => Self::Storage(e),
            CoreError::Canceled => Self::Canceled,
        }
    }
}
