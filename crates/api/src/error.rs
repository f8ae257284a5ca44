//! Application error types and HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::db::RepositoryError;
use crate::services::profit::ProfitError;
use crate::services::stock::StockBatchError;
use crate::services::uploads::UploadError;

/// Top level application error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database error.
    #[error(transparent)]
    Database(#[from] RepositoryError),

    /// Stock batch error.
    #[error(transparent)]
    Stock(#[from] StockBatchError),

    /// Profit calculation error.
    #[error(transparent)]
    Profit(#[from] ProfitError),

    /// Image upload error.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// A requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request was malformed.
    #[error("{0}")]
    BadRequest(String),

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound)
            | Self::Stock(StockBatchError::NotFound(_))
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) | Self::Stock(StockBatchError::Conflict) => {
                StatusCode::CONFLICT
            }
            Self::Stock(
                StockBatchError::InsufficientStock { .. } | StockBatchError::InvalidInput(_),
            )
            | Self::Profit(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upload(UploadError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upload(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Stock(StockBatchError::Repository(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message sent to the client. Server-side failures are masked.
    fn message(&self) -> String {
        if self.status().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "request failed");
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Convenience alias for handler results.
pub type Result<T> = std::result::Result<T, AppError>;
