pub mod combine_input;
pub mod context_retrieval;
pub mod generation;
pub mod prompt_builder;
pub mod response_parser;

pub use combine_input::CombineInputTask;
pub use context_retrieval::RetrieveContextTask;
pub use generation::GenerateTask;
pub use prompt_builder::BuildPromptTask;
pub use response_parser::ParseResponseTask;

/// Keys the analysis tasks read from and write to in the pipeline context
pub mod context_keys {
    pub const INPUT: &str = "medical_input";
    pub const COMBINED_TEXT: &str = "combined_text";
    pub const RAG_CONTEXT: &str = "rag_context";
    pub const PROMPT: &str = "prompt";
    pub const RESPONSE_TEXT: &str = "response_text";
    pub const ANALYSIS_RESULT: &str = "analysis_result";
}
