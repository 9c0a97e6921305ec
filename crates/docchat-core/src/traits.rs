//! Core traits for docchat components.
//!
//! These are the seams of the pipeline:
//!
//! - [`DocumentLoader`]: Extract documents from a file path
//! - [`Embedder`]: Generate vector embeddings for text
//! - [`VectorIndex`]: Store embedded chunks and search by similarity
//!
//! Each trait is object-safe so components can be swapped, including with
//! fakes in tests, without touching the rest of the system.

use async_trait::async_trait;
use std::path::Path;

use crate::error::{EmbedError, ExtractError, IndexError};
use crate::types::{Document, IndexEntry, ScoredChunk};

// ============================================================================
// Document loading
// ============================================================================

/// Trait for extracting documents from a local file.
///
/// URL sources are handled separately by the web loader; this trait covers
/// the extension-dispatched file formats.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Lowercased file extensions this loader handles.
    fn extensions(&self) -> &[&str];

    /// Check whether this loader handles the given path.
    fn can_load(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                self.extensions().iter().any(|e| *e == ext)
            })
    }

    /// Extract documents from a file.
    async fn load(&self, path: &Path) -> Result<Vec<Document>, ExtractError>;
}

// ============================================================================
// Embedding
// ============================================================================

/// Trait for generating embeddings.
///
/// Embedding is a pure function from text to a fixed-length vector; the
/// model behind it is an external collaborator.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name/identifier.
    fn model_name(&self) -> &str;

    /// Embedding dimension.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts, one vector per input, in order.
    async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Embed a single query.
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbedError> {
        let results = self.embed_texts(&[query]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::Inference("empty embedding result".to_string()))
    }
}

// ============================================================================
// Vector index
// ============================================================================

/// Trait for storing embedded chunks and searching them by similarity.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Replace the entire index contents in one atomic step.
    ///
    /// A concurrent search observes either the full previous generation or
    /// the full new one, never a mix. Previous entries are released.
    async fn replace(&self, entries: Vec<IndexEntry>) -> Result<(), IndexError>;

    /// Search for the most similar chunks.
    ///
    /// Results are ordered by score descending, contain at most `limit`
    /// entries, and every entry scores at least `min_score`. An empty index
    /// yields an empty result, not an error.
    async fn search(
        &self,
        embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredChunk>, IndexError>;

    /// Drop all entries.
    async fn clear(&self) -> Result<(), IndexError>;

    /// Number of indexed entries.
    async fn len(&self) -> usize;

    /// Whether the index holds no entries.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Distinct `origin` metadata values of the indexed chunks.
    async fn sources(&self) -> Vec<String>;
}
