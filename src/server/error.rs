//! HTTP-facing errors. Every failure becomes `{"error": msg}` with a
//! non-success status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::utilities::errors::MuzaError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Текст пустой")]
    EmptyText,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    Internal(#[from] MuzaError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyText => StatusCode::BAD_REQUEST,
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(MuzaError::Json(e))
    }
}

impl From<tera::Error> for ApiError {
    fn from(e: tera::Error) -> Self {
        Self::Internal(MuzaError::Template(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
