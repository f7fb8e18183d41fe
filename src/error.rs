// HTTP API error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::store::StoreError;
use crate::validation::FieldError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Error bodies are `{"error": <message>}`, except validation failures
/// which carry the full violation list as `{"errors": [{field, message}]}`.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation(Vec<FieldError>),
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    /// Wrap an upstream failure: log the real cause, hand the client a
    /// stable message. Collaborator payloads never reach the response body.
    pub fn upstream(err: impl std::fmt::Display, message: &str) -> Self {
        tracing::error!("{}: {}", message, err);
        ApiError::Internal(message.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Map a store lookup failure: missing row becomes a resource-specific 404,
/// anything else a logged 500.
pub fn lookup_err(err: StoreError, missing: &str, failure: &str) -> ApiError {
    match err {
        StoreError::NotFound => ApiError::not_found(missing),
        other => ApiError::upstream(other, failure),
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(errors) => write!(f, "validation failed ({} errors)", errors.len()),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Validation(errors) => {
                (status, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::BadRequest(message)
            | ApiError::Unauthorized(message)
            | ApiError::Forbidden(message)
            | ApiError::NotFound(message)
            | ApiError::Internal(message) => {
                (status, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}
