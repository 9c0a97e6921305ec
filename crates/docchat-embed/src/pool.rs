//! Embedder pool for concurrent embedding operations.

use docchat_core::{EmbedError, Embedder};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Embedder wrapper with concurrency control.
///
/// Ingest can fan out embedding work; the semaphore caps how much of it
/// runs against the backend at once.
pub struct EmbedderPool {
    embedder: Arc<dyn Embedder>,
    semaphore: Semaphore,
    max_concurrent: usize,
}

impl EmbedderPool {
    /// Create a new embedder pool.
    pub fn new(embedder: Arc<dyn Embedder>, max_concurrent: usize) -> Self {
        Self {
            embedder,
            semaphore: Semaphore::new(max_concurrent),
            max_concurrent,
        }
    }

    /// Get the embedding dimension.
    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    /// Get the model name.
    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Embed a batch of texts.
    pub async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| EmbedError::Inference(format!("semaphore error: {e}")))?;

        self.embedder.embed_texts(texts).await
    }

    /// Embed a single query.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbedError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| EmbedError::Inference(format!("semaphore error: {e}")))?;

        self.embedder.embed_query(query).await
    }

    /// Currently available permits.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Maximum concurrent operations.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}
