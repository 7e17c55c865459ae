use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use task_flow::FlowError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Failure while serving an analysis request.
///
/// The variant is only used for logging: every variant is returned to the
/// caller as the same 500 response whose `detail` is the message.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Extraction(String),

    #[error("{0}")]
    Pipeline(String),
}

impl AnalysisError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Extraction(_) => "extraction",
            Self::Pipeline(_) => "pipeline",
        }
    }
}

impl From<FlowError> for AnalysisError {
    fn from(err: FlowError) -> Self {
        match err {
            // Surface the task's own error, not the pipeline wrapper.
            FlowError::TaskFailed { source, .. } => Self::Pipeline(source.to_string()),
            other => Self::Pipeline(other.to_string()),
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        error!(kind = self.kind(), detail = %self, "Analysis request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
