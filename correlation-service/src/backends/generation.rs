use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

use crate::config::GenerationSettings;

/// Text-generation backend: prompt in, free-form text out
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Returns a fixed reply in the `Key: value` line format the parser expects
pub struct StubGenerator;

pub const STUB_REPLY: &str = "Discrepancy: Yes\n\
                              Summary: Radiology vs Labs mismatch.\n\
                              Diagnostic Explanation: Further evaluation needed.";

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(STUB_REPLY.to_string())
    }
}

/// Wraps another generator with a per-attempt timeout and bounded retries.
///
/// When every attempt fails, the last attempt's error is returned unchanged.
pub struct ResilientGenerator {
    inner: Arc<dyn Generator>,
    settings: GenerationSettings,
}

impl ResilientGenerator {
    pub fn new(inner: Arc<dyn Generator>, settings: GenerationSettings) -> Self {
        Self { inner, settings }
    }

    async fn attempt(&self, prompt: &str) -> anyhow::Result<String> {
        match tokio::time::timeout(self.settings.timeout, self.inner.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "generation timed out after {}s",
                self.settings.timeout.as_secs_f64()
            )),
        }
    }
}

#[async_trait]
impl Generator for ResilientGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let attempts = self.settings.max_retries + 1;
        let mut attempt = 1;

        loop {
            match self.attempt(prompt).await {
                Ok(text) => {
                    if attempt > 1 {
                        info!(attempt, "Generation succeeded after retry");
                    }
                    return Ok(text);
                }
                Err(e) if attempt < attempts => {
                    warn!(attempt, attempts, error = %e, "Generation attempt failed, retrying");
                    tokio::time::sleep(backoff(self.settings.retry_backoff, attempt)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn backoff(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(attempt)
}
