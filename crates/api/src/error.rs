//! HTTP error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_cleaner::CleaningError;
use record_set::RecordSetError;
use serde::Serialize;
use thiserror::Error;
use track_explorer::ExplorerError;

/// Error response body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Error code for programmatic handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

/// Errors returned by handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Uploaded file could not be read as a table
    #[error("Could not parse uploaded file: {0}")]
    Upload(#[from] RecordSetError),

    /// Upload parsed but the cleaning run could not transform it
    #[error("Could not clean uploaded file: {0}")]
    Cleaning(#[from] CleaningError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Upload(_) => (StatusCode::BAD_REQUEST, "INVALID_UPLOAD"),
            ApiError::Cleaning(_) => (StatusCode::UNPROCESSABLE_ENTITY, "CLEANING_FAILED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<ExplorerError> for ApiError {
    fn from(err: ExplorerError) -> Self {
        match err {
            ExplorerError::SessionNotFound(_) | ExplorerError::UnknownInsight(_) => {
                ApiError::NotFound(err.to_string())
            }
            ExplorerError::MissingColumn(_) | ExplorerError::Frame(_) => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;
