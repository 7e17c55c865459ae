use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::AnalysisError;

/// Turns uploaded document bytes into per-page text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_pages(&self, bytes: Vec<u8>) -> Result<Vec<String>, AnalysisError>;
}

/// Text-layer PDF extraction via `pdf-extract`.
///
/// Scanned pages without a text layer come back empty and are skipped by
/// [`join_pages`].
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_pages(&self, bytes: Vec<u8>) -> Result<Vec<String>, AnalysisError> {
        info!(size = bytes.len(), "Extracting text from PDF");

        // pdf-extract is CPU bound and may panic on malformed input
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        })
        .await
        .map_err(|e| AnalysisError::Extraction(format!("PDF extraction aborted: {e}")))?
        .map_err(|e| AnalysisError::Extraction(e.to_string()))?;

        info!(pages = pages.len(), "PDF text extracted");
        Ok(pages)
    }
}

/// Concatenate the pages that produced text, each followed by a newline.
pub fn join_pages(pages: &[String]) -> String {
    let mut text = String::new();
    let mut skipped = 0;

    for page in pages {
        if page.is_empty() {
            skipped += 1;
            continue;
        }
        text.push_str(page);
        text.push('\n');
    }

    if skipped > 0 {
        warn!(skipped, "Skipped pages without extractable text");
    }
    text
}

pub async fn extract_document_text(
    extractor: &dyn TextExtractor,
    bytes: Vec<u8>,
) -> Result<String, AnalysisError> {
    let pages = extractor.extract_pages(bytes).await?;
    Ok(join_pages(&pages))
}
