use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::blockchain::models::ChainError;

/// Errors surfaced to API callers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The query matched no search rule. User-correctable.
    #[error("{0}")]
    InvalidQuery(String),
    /// A well-formed identifier with no chain data behind it.
    #[error("{0}")]
    NotFound(String),
    /// The chain-data source failed or timed out.
    #[error("upstream fetch failed: {0}")]
    UpstreamFetchFailure(#[from] ChainError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UpstreamFetchFailure(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
