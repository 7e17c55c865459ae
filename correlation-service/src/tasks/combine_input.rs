use async_trait::async_trait;
use task_flow::{Context, NextAction, Result, Task, TaskResult};
use tracing::info;

use super::context_keys;
use crate::models::MedicalInput;

/// Joins the three structured fields into the labeled combined text
pub struct CombineInputTask;

#[async_trait]
impl Task for CombineInputTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let input: MedicalInput = context.require(context_keys::INPUT).await?;
        let combined = input.combined_text();

        info!(
            combined_length = combined.len(),
            "Combined patient input"
        );
        context.set(context_keys::COMBINED_TEXT, combined).await?;

        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
