//! API error types

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fc_db::error::DatabaseError;
use fc_stats::StatsError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Stats error: {0}")]
    Stats(#[from] StatsError),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) | Self::Database(DatabaseError::NoResult) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Database(DatabaseError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Database(e) if e.is_transient() => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
            }
            Self::Stats(e) if e.is_transient() => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
            }
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            Self::Stats(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STATS_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Reject blank required fields.
pub(crate) fn require(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_outage_is_503() {
        let err = ApiError::Database(DatabaseError::Unavailable("locked".into()));
        assert_eq!(err.status_and_code().0, StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::Stats(StatsError::Store(DatabaseError::Unavailable("x".into())));
        assert_eq!(err.status_and_code().0, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn missing_row_is_404_and_conflict_is_409() {
        assert_eq!(
            ApiError::Database(DatabaseError::NoResult).status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Database(DatabaseError::Conflict("dup".into()))
                .status_and_code()
                .0,
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn blank_fields_rejected() {
        assert!(require("name", "  ").is_err());
        assert!(require("name", "Alan").is_ok());
    }
}
