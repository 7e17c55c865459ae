use async_trait::async_trait;
use std::sync::Arc;
use task_flow::{Context, FlowError, NextAction, Result, Task, TaskResult};

use super::context_keys;
use crate::backends::Retriever;

pub struct RetrieveContextTask {
    retriever: Arc<dyn Retriever>,
}

impl RetrieveContextTask {
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Task for RetrieveContextTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let combined: String = context.require(context_keys::COMBINED_TEXT).await?;

        let rag_context = self
            .retriever
            .retrieve(&combined)
            .await
            .map_err(|e| FlowError::task_failed(self.id(), e))?;

        context.set(context_keys::RAG_CONTEXT, &rag_context).await?;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::Continue,
            Some(format!("Retrieved {} characters of context", rag_context.len())),
        ))
    }
}
