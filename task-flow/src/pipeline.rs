use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    context::Context,
    error::{FlowError, Result},
    task::{NextAction, Task},
};

/// An ordered chain of tasks sharing one [`Context`] per run.
///
/// A pipeline holds no per-run state, so a single instance can be shared
/// behind an `Arc` and run concurrently with independent contexts.
pub struct Pipeline {
    pub id: String,
    tasks: Vec<Arc<dyn Task>>,
}

impl Pipeline {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tasks: Vec::new(),
        }
    }

    pub fn add_task(&mut self, task: Arc<dyn Task>) -> &mut Self {
        self.tasks.push(task);
        self
    }

    pub fn task_ids(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.id()).collect()
    }

    /// Run every task in order until one returns [`NextAction::End`] or the
    /// chain is exhausted. The first failing task aborts the run.
    pub async fn run(&self, context: Context) -> Result<ExecutionResult> {
        if self.tasks.is_empty() {
            return Err(FlowError::EmptyPipeline(self.id.clone()));
        }

        let mut executed = Vec::with_capacity(self.tasks.len());
        let mut response = None;

        for task in &self.tasks {
            let task_id = task.id();
            debug!(pipeline = %self.id, task_id = %task_id, "Running task");

            let result = task.run(context.clone()).await?;
            executed.push(task_id.to_string());

            if let Some(status) = &result.status_message {
                info!(pipeline = %self.id, task_id = %task_id, "{}", status);
            }
            if result.response.is_some() {
                response = result.response;
            }
            if result.next_action == NextAction::End {
                break;
            }
        }

        Ok(ExecutionResult { response, executed })
    }
}

/// Outcome of a completed pipeline run
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Last response produced by any task
    pub response: Option<String>,
    /// Ids of the tasks that ran, in order
    pub executed: Vec<String>,
}

/// Builder for creating pipelines
pub struct PipelineBuilder {
    pipeline: Pipeline,
}

impl PipelineBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            pipeline: Pipeline::new(id),
        }
    }

    pub fn add_task(mut self, task: Arc<dyn Task>) -> Self {
        self.pipeline.add_task(task);
        self
    }

    pub fn build(self) -> Pipeline {
        self.pipeline
    }
}
