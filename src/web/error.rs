// Error types for the API server

use crate::notebook::NotebookError;
use axum::{
    Json,
    extract::rejection::{BytesRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// API server error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Forbidden(String),
    NotFound(String),
    MethodNotAllowed(String),
    PayloadTooLarge(String),
    InternalServerError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::MethodNotAllowed(msg)
            | Self::PayloadTooLarge(msg)
            | Self::InternalServerError(msg) => msg,
        };

        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, message);
        }

        let body = Json(json!({
            "code": status.as_u16(),
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<NotebookError> for ApiError {
    fn from(error: NotebookError) -> Self {
        match error {
            NotebookError::DirectoryNotFound(_) => Self::NotFound("Directory not found".into()),
            NotebookError::ImageNotFound(_) => Self::NotFound("Image not found".into()),
            NotebookError::ImageDataNotFound(_) => Self::NotFound("Image data not found".into()),
            NotebookError::PluginNotFound(_) => Self::NotFound("Plugin not found".into()),
            NotebookError::OutsideRoot(_) => Self::Forbidden(error.to_string()),
            NotebookError::Validation(msg) => Self::BadRequest(msg),
            NotebookError::MalformedData { .. }
            | NotebookError::Storage { .. }
            | NotebookError::PluginFailed { .. } => Self::InternalServerError(error.to_string()),
        }
    }
}

impl ApiError {
    // Extractor rejections keep their status and text, re-encoded as JSON.
    fn from_rejection(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::PAYLOAD_TOO_LARGE => Self::PayloadTooLarge(message),
            _ => Self::InternalServerError(message),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}
