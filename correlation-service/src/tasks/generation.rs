use async_trait::async_trait;
use std::sync::Arc;
use task_flow::{Context, FlowError, NextAction, Result, Task, TaskResult};
use tracing::info;

use super::context_keys;
use crate::backends::Generator;

/// Sends the prompt to the generation backend
pub struct GenerateTask {
    generator: Arc<dyn Generator>,
}

impl GenerateTask {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Task for GenerateTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let prompt: String = context.require(context_keys::PROMPT).await?;
        info!(prompt_length = prompt.len(), "Calling generation backend");

        let response_text = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| FlowError::task_failed(self.id(), e))?;

        context
            .set(context_keys::RESPONSE_TEXT, &response_text)
            .await?;

        Ok(TaskResult::new_with_status(
            Some(response_text),
            NextAction::Continue,
            Some("Generation backend replied".to_string()),
        ))
    }
}
