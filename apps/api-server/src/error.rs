//! API error types and their HTTP mapping.
//!
//! Every handler returns `Result<_, ApiError>`; the `IntoResponse` impl
//! turns the error into a JSON envelope `{ "code": ..., "message": ... }`
//! with the matching status code.
//!
//! ## Status Mapping
//! ```text
//! ApiError::Validation       → 400 Bad Request
//! ApiError::Unauthorized     → 401 Unauthorized
//! ApiError::NotFound         → 404 Not Found
//! ApiError::Conflict         → 409 Conflict
//! everything else            → 500 Internal Server Error
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use ured_core::ValidationError;
use ured_db::DbError;

/// API-level errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed validation.
    #[error("{0}")]
    Validation(String),

    /// Missing or bad credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Entity does not exist.
    #[error("{entity} not found")]
    NotFound { entity: String },

    /// Uniqueness conflict that survived retries.
    #[error("{0}")]
    Conflict(String),

    /// Anything the client can't fix.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Stable machine-readable code for the response envelope.
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error envelope sent to the client.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Internals are logged server-side, never leaked to the client
        if let ApiError::Internal(ref detail) = self {
            error!(detail = %detail, "Internal error");
        }

        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } => ApiError::NotFound { entity },
            DbError::UniqueViolation { field, .. } => {
                ApiError::Conflict(format!("Duplicate value for {}", field))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::not_found("Client", "c-1").into();
        assert!(matches!(err, ApiError::NotFound { .. }));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = DbError::UniqueViolation {
            field: "invoices.number".to_string(),
            value: "223/25".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: ApiError = DbError::PoolExhausted.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_message_is_opaque() {
        let err = ApiError::Internal("sqlite disk I/O error at page 9".to_string());
        assert_eq!(err.to_string(), "Internal server error");
    }
}
