use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::handlers::ApiResponse;

/// Failures while rendering or writing a package archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("metadata serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while scanning or reading the package store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("packages directory {path} is not readable: {source}")]
    Scan {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Errors surfaced to HTTP callers
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{}", validation_message(.0))]
    Validation(Vec<String>),
    #[error("{0}")]
    NotFound(String),
    #[error("Failed to create package: {0}")]
    Build(#[source] StoreError),
    #[error("Failed to {action}: {source}")]
    Storage {
        action: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("{0}")]
    Internal(String),
}

/// Requests failing only on dependencies get the `Invalid dependency format` prefix
fn validation_message(errors: &[String]) -> String {
    let prefix = if errors.iter().all(|e| e.starts_with("Dependency ")) {
        "Invalid dependency format"
    } else {
        "Invalid package request"
    };
    format!("{}: {}", prefix, errors.join("; "))
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Build(_) | ServiceError::Storage { .. } | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(e: tokio::task::JoinError) -> Self {
        ServiceError::Internal(format!("Background task failed: {}", e))
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}
