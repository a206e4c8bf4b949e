//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Invalid or missing bearer tokens
/// - **Resource Errors**: Shares, tools, or categories that cannot be found
/// - **Validation Errors**: Invalid request data
/// - **Operational Errors**: Share-id space exhaustion during save
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Bearer token is missing, invalid, or inactive.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid token")]
    InvalidToken,

    /// No visible shared configuration for the requested share id.
    ///
    /// Returned uniformly whether the record never existed, was soft
    /// deleted, or has expired. Collapsing the three cases into one
    /// response avoids leaking the existence of dead links.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Shared configuration not found")]
    ShareNotFound,

    /// No active tool metadata for the requested tool key.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Tool not found")]
    ToolNotFound,

    /// No category matches the requested id or name.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Category not found")]
    CategoryNotFound,

    /// A category with the requested name already exists.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Category already exists")]
    DuplicateCategory,

    /// Every save attempt collided on the share id.
    ///
    /// This is a rare operational failure: either the identifier space is
    /// misconfigured (too short for the number of live records) or the
    /// storage layer is misbehaving. It is surfaced to the caller rather
    /// than swallowed.
    ///
    /// Returns HTTP 503 Service Unavailable.
    #[error("Could not allocate a unique share id")]
    ShareIdExhausted,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidToken` → 401 Unauthorized
/// - `ShareNotFound` / `ToolNotFound` / `CategoryNotFound` → 404 Not Found
/// - `DuplicateCategory` → 409 Conflict
/// - `InvalidRequest` → 400 Bad Request
/// - `ShareIdExhausted` → 503 Service Unavailable
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", self.to_string()),
            AppError::ShareNotFound => {
                (StatusCode::NOT_FOUND, "share_not_found", self.to_string())
            }
            AppError::ToolNotFound => (StatusCode::NOT_FOUND, "tool_not_found", self.to_string()),
            AppError::CategoryNotFound => {
                (StatusCode::NOT_FOUND, "category_not_found", self.to_string())
            }
            AppError::DuplicateCategory => {
                (StatusCode::CONFLICT, "duplicate_category", self.to_string())
            }
            AppError::ShareIdExhausted => (
                StatusCode::SERVICE_UNAVAILABLE,
                "share_id_exhausted",
                self.to_string(),
            ),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AppError::InvalidRequest("x".into())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::ShareNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DuplicateCategory.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ShareIdExhausted.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolClosed)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
