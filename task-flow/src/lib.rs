//! Minimal task pipelines: a chain of async [`Task`]s that read from and
//! write to a per-run [`Context`].

pub mod context;
pub mod error;
pub mod pipeline;
pub mod task;

pub use context::Context;
pub use error::{FlowError, Result};
pub use pipeline::{ExecutionResult, Pipeline, PipelineBuilder};
pub use task::{NextAction, Task, TaskResult};

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct AppendTask {
        id: String,
        next_action: NextAction,
    }

    #[async_trait]
    impl Task for AppendTask {
        fn id(&self) -> &str {
            &self.id
        }

        async fn run(&self, context: Context) -> Result<TaskResult> {
            let mut trail: Vec<String> = context.get("trail").await.unwrap_or_default();
            trail.push(self.id.clone());
            context.set("trail", &trail).await?;

            Ok(TaskResult::new(
                Some(format!("{} done", self.id)),
                self.next_action,
            ))
        }
    }

    struct FailingTask;

    #[async_trait]
    impl Task for FailingTask {
        async fn run(&self, _context: Context) -> Result<TaskResult> {
            Err(FlowError::task_failed(
                self.id(),
                anyhow::anyhow!("backend unavailable"),
            ))
        }
    }

    fn append(id: &str, next_action: NextAction) -> Arc<dyn Task> {
        Arc::new(AppendTask {
            id: id.to_string(),
            next_action,
        })
    }

    #[tokio::test]
    async fn test_tasks_run_in_order() {
        let pipeline = PipelineBuilder::new("test_pipeline")
            .add_task(append("first", NextAction::Continue))
            .add_task(append("second", NextAction::Continue))
            .build();

        let context = Context::new();
        let result = pipeline.run(context.clone()).await.unwrap();

        assert_eq!(result.executed, vec!["first", "second"]);
        assert_eq!(result.response.as_deref(), Some("second done"));

        let trail: Vec<String> = context.get("trail").await.unwrap();
        assert_eq!(trail, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_end_stops_the_pipeline() {
        let pipeline = PipelineBuilder::new("test_pipeline")
            .add_task(append("first", NextAction::End))
            .add_task(append("second", NextAction::Continue))
            .build();

        let result = pipeline.run(Context::new()).await.unwrap();

        assert_eq!(result.executed, vec!["first"]);
    }

    #[tokio::test]
    async fn test_failure_aborts_and_keeps_source_message() {
        let pipeline = PipelineBuilder::new("test_pipeline")
            .add_task(Arc::new(FailingTask))
            .add_task(append("never", NextAction::Continue))
            .build();

        let context = Context::new();
        let err = pipeline.run(context.clone()).await.unwrap_err();

        match err {
            FlowError::TaskFailed { task_id, source } => {
                assert!(task_id.ends_with("FailingTask"));
                assert_eq!(source.to_string(), "backend unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!context.contains("trail"));
    }

    #[tokio::test]
    async fn test_empty_pipeline_is_an_error() {
        let pipeline = Pipeline::new("empty");

        let err = pipeline.run(Context::new()).await.unwrap_err();
        assert!(matches!(err, FlowError::EmptyPipeline(_)));
    }

    #[test]
    fn test_default_task_id_is_type_name() {
        let pipeline = PipelineBuilder::new("ids")
            .add_task(Arc::new(FailingTask))
            .build();

        assert_eq!(pipeline.task_ids(), vec![std::any::type_name::<FailingTask>()]);
    }
}
