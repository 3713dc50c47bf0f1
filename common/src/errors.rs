//! Application error type.
//!
//! Every handler returns `Result<_, AppError>`; the `IntoResponse` impl turns
//! an error into the standard envelope with a human-readable message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::ApiResponse;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No database connection")]
    NotConnected,

    #[error("{0}")]
    Validation(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to connect to database: {0}")]
    DatabaseConnection(String),

    #[error("Database operation error: {0}")]
    DatabaseQuery(String),
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotConnected
            | AppError::Validation(_)
            | AppError::UnsupportedOperation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseConnection(_) | AppError::DatabaseQuery(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Error code for client handling.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotConnected => "NOT_CONNECTED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UnsupportedOperation(_) => "UNSUPPORTED_OPERATION",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DatabaseConnection(_) => "DB_CONNECTION_FAILED",
            AppError::DatabaseQuery(_) => "DB_QUERY_FAILED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %message, "request failed");
        } else {
            tracing::warn!(code = self.code(), error = %message, "request rejected");
        }

        (status, Json(ApiResponse::err(self.code(), message))).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_errors_are_bad_request() {
        assert_eq!(AppError::NotConnected.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Validation("Data is required for create operation".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnsupportedOperation("merge".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_database_errors_are_server_errors() {
        let err = AppError::DatabaseQuery("Table 'x.nope' doesn't exist".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Database operation error: Table 'x.nope' doesn't exist"
        );
        assert_eq!(err.code(), "DB_QUERY_FAILED");
    }

    #[test]
    fn test_messages_are_human_readable() {
        assert_eq!(AppError::NotConnected.to_string(), "No database connection");
        assert_eq!(
            AppError::UnsupportedOperation("merge".into()).to_string(),
            "Unsupported operation: merge"
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::NotFound("Unknown predefined query: x".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
