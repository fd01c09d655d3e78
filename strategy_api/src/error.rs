use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use strategy_core::SnapshotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(#[from] SnapshotError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidSnapshot(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!("rejected request: {}", self);
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
