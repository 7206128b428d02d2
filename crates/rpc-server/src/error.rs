//! REST error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bridge_checkpoint::CheckpointError;
use bridge_staking::StakingError;
use bridge_store::StoreError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("transaction generation failed: {0}")]
    Tx(anyhow::Error),
    #[error("not found")]
    NotFound,
}

impl From<StakingError> for ApiError {
    fn from(e: StakingError) -> Self {
        ApiError::Store(StoreError::Staking(e))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Checkpoint(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Staking(StakingError::InvalidInput(_))) => {
                StatusCode::BAD_REQUEST
            }
            // absence is reported as an empty result, not a failure
            ApiError::NotFound => StatusCode::NO_CONTENT,
            ApiError::Store(_) | ApiError::Tx(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::NotFound = self {
            return status.into_response();
        }
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
