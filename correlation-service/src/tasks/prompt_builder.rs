use async_trait::async_trait;
use task_flow::{Context, NextAction, Result, Task, TaskResult};

use super::context_keys;

/// Build the generation prompt from retrieved context and the combined
/// patient text. Pure and infallible; empty inputs are allowed.
pub fn build_prompt(rag_context: &str, combined_text: &str) -> String {
    format!(
        "RAG Context:\n\
         {rag_context}\n\
         \n\
         Patient Data:\n\
         {combined_text}\n\
         \n\
         Provide:\n\
         - Discrepancy Yes/No\n\
         - Summary\n\
         - Diagnostic explanation\n"
    )
}

pub struct BuildPromptTask;

#[async_trait]
impl Task for BuildPromptTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let rag_context: String = context.require(context_keys::RAG_CONTEXT).await?;
        let combined: String = context.require(context_keys::COMBINED_TEXT).await?;

        context
            .set(context_keys::PROMPT, build_prompt(&rag_context, &combined))
            .await?;

        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
