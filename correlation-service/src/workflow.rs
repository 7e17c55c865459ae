use std::sync::Arc;
use task_flow::{Context, Pipeline, PipelineBuilder};
use tracing::info;

use crate::{
    backends::{Generator, Retriever},
    error::AnalysisError,
    extraction::{TextExtractor, extract_document_text},
    models::{AnalysisResult, MedicalInput},
    tasks::{
        BuildPromptTask, CombineInputTask, GenerateTask, ParseResponseTask, RetrieveContextTask,
        context_keys,
    },
};

pub fn build_analysis_pipeline(
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn Generator>,
) -> Pipeline {
    PipelineBuilder::new("correlation_analysis")
        .add_task(Arc::new(CombineInputTask))
        .add_task(Arc::new(RetrieveContextTask::new(retriever)))
        .add_task(Arc::new(BuildPromptTask))
        .add_task(Arc::new(GenerateTask::new(generator)))
        .add_task(Arc::new(ParseResponseTask))
        .build()
}

/// Run the analysis pipeline for one request on a fresh context.
pub async fn run_analysis(
    pipeline: &Pipeline,
    input: MedicalInput,
) -> Result<AnalysisResult, AnalysisError> {
    let context = Context::new();
    context.set(context_keys::INPUT, input).await?;

    let execution = pipeline.run(context.clone()).await?;
    info!(tasks = execution.executed.len(), "Analysis pipeline finished");

    Ok(context.require(context_keys::ANALYSIS_RESULT).await?)
}

/// Extract the document text and analyze it as clinical notes.
pub async fn analyze_document(
    pipeline: &Pipeline,
    extractor: &dyn TextExtractor,
    bytes: Vec<u8>,
) -> Result<AnalysisResult, AnalysisError> {
    let text = extract_document_text(extractor, bytes).await?;
    run_analysis(pipeline, MedicalInput::from_document_text(text)).await
}
