//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::services::pdf::RenderError;

/// Application-level error types
///
/// All errors that can occur in the application are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// A query parameter is missing or malformed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// File, directory or PDF page was not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Path is invalid (e.g., escapes its root or contains separators)
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Permission denied for the requested operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Path exists but is not a directory
    #[error("Path is not a directory: {0}")]
    NotADirectory(String),

    /// PDF rasterization or inspection failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable error message
    pub error: String,
    /// HTTP status code, repeated in the body
    pub status: u16,
}

impl AppError {
    /// HTTP status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::FileNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotADirectory(_) => StatusCode::BAD_REQUEST,
            AppError::Render(RenderError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %error_message, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: error_message,
            status: status.as_u16(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("pagenumber".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::FileNotFound("a.pdf".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::PermissionDenied("dir".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Render(RenderError::Timeout(30)).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::Render(RenderError::InvalidOutput("empty".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_response_body() {
        let response = AppError::FileNotFound("missing.png".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("Invalid JSON");
        assert_eq!(body["status"], 404);
        assert_eq!(body["error"], "File not found: missing.png");
    }
}
