// Service errors and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Required input missing or blank
    #[error("{0}")]
    Validation(String),

    #[error("No stats found for player {0}")]
    NotFound(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Store call failed or timed out
    #[error("Store unavailable: {0}")]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Validation(_) | ServiceError::UnknownMetric(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            ServiceError::Store(e) => {
                error!("Store error: {:?}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
