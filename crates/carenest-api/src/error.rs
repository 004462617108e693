//! Maps store errors onto HTTP responses.
//!
//! Every error body is `{"error": <kind>, "message": <text>}`. Storage and
//! internal failures are logged and answered with a generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use carenest_db::{DbError, ValidationError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(DbError),

    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Database(_) | Self::Internal(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Database(e) => {
                error!("Database error: {}", e);
                "an internal error occurred".to_string()
            }
            Self::Internal(msg) => {
                error!("Internal error: {}", msg);
                "an internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "error": self.kind(),
            "message": message,
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { .. } | DbError::DanglingReference(_) => Self::NotFound(e.to_string()),
            DbError::Conflict { .. } => Self::Conflict(e.to_string()),
            DbError::Validation(v) => v.into(),
            other => Self::Database(other),
        }
    }
}
