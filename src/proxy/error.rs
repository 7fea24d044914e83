use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Missing step or workflow parameter")]
    MissingParameter,

    /// Upstream answered with a non-success status; it is passed through.
    #[error("Failed to fetch workflow data")]
    Upstream(StatusCode),

    #[error("Step \"{step}\" not found in workflow \"{workflow}\"")]
    StepNotFound { step: String, workflow: String },

    #[error("Internal Server Error")]
    Internal(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::MissingParameter => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(status) => *status,
            ProxyError::StepNotFound { .. } => StatusCode::NOT_FOUND,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            ProxyError::Internal(detail) => {
                tracing::error!(status = %status, error = %detail, "Proxy error");
            }
            _ => {
                tracing::warn!(status = %status, error = %self, "Proxy request failed");
            }
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
