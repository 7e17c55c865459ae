use thiserror::Error;

/// Errors raised while running a pipeline
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("task {task_id} failed: {source}")]
    TaskFailed {
        task_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("context key not set: {0}")]
    MissingContext(String),

    #[error("context value could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("pipeline {0} has no tasks")]
    EmptyPipeline(String),
}

impl FlowError {
    pub fn task_failed(task_id: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::TaskFailed {
            task_id: task_id.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
