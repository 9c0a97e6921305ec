//! PDF content loader.
//!
//! Uses pdf-extract for text content. Pages are split on form feeds so each
//! page becomes its own document with a `page` metadata entry.

use async_trait::async_trait;
use docchat_core::{Document, DocumentLoader, ExtractError};
use std::path::Path;
use tracing::debug;

/// Loader for PDF files.
pub struct PdfLoader;

impl PdfLoader {
    /// Create a new PDF loader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentLoader for PdfLoader {
    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    async fn load(&self, path: &Path) -> Result<Vec<Document>, ExtractError> {
        debug!("extracting pdf: {:?}", path);

        let bytes = tokio::fs::read(path).await?;

        // pdf-extract is blocking
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| ExtractError::Failed(format!("task join error: {e}")))?
        .map_err(ExtractError::Parse)?;

        let origin = path.to_string_lossy().into_owned();
        Ok(split_pages(&text)
            .into_iter()
            .enumerate()
            .map(|(idx, page_text)| {
                Document::new(page_text)
                    .with_metadata("origin", origin.clone())
                    .with_metadata("page", (idx + 1).to_string())
            })
            .collect())
    }
}

/// Split extracted text into pages on form feeds.
///
/// Falls back to the whole text as a single page when no form feed is
/// present. Blank pages are dropped.
fn split_pages(text: &str) -> Vec<String> {
    text.split('\x0C')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .map(str::to_string)
        .collect()
}
