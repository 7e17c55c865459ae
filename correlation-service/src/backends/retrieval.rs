use async_trait::async_trait;

/// Supplies supporting medical context for the combined patient text
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, text: &str) -> anyhow::Result<String>;
}

/// Placeholder until a real knowledge index is plugged in
pub struct StubRetriever;

pub const STUB_CONTEXT: &str = "Relevant medical knowledge found.";

#[async_trait]
impl Retriever for StubRetriever {
    async fn retrieve(&self, _text: &str) -> anyhow::Result<String> {
        Ok(STUB_CONTEXT.to_string())
    }
}
