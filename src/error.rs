use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

/// Failure reported by a JSON endpoint.
///
/// These are rendered as `{"status": "error", "message": ...}` with HTTP 200,
/// which is what the dashboard script checks for.
#[derive(Debug)]
pub enum ApiError {
    Invalid(String),
    BadBody(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(msg) => write!(f, "{msg}"),
            Self::BadBody(msg) => write!(f, "Malformed request body: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!("rejected api request: {self}");
        Json(json!({ "status": "error", "message": self.to_string() })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Invalid(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::BadBody(e.body_text())
    }
}
