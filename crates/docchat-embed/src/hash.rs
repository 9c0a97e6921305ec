//! Deterministic hash-based embedder.
//!
//! This module provides a [`HashEmbedder`] that derives unit-length vectors
//! from a blake3 hash of the input. It's useful for:
//! - Running fully offline, with no model runtime
//! - Deterministic tests (same text always embeds identically)
//! - Development builds with no network access
//!
//! Identical texts map to identical vectors (cosine similarity 1.0);
//! unrelated texts land far apart. It carries no semantic signal, so it is
//! a stand-in, not a retrieval-quality embedding.

use async_trait::async_trait;
use docchat_core::{EmbedError, Embedder};

/// Deterministic embedder backed by blake3 extendable output.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create a hash embedder with the default dimension (384).
    #[must_use]
    pub fn new() -> Self {
        Self { dimension: 384 }
    }

    /// Create a hash embedder with a custom dimension.
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut reader = blake3::Hasher::new().update(text.as_bytes()).finalize_xof();
        let mut bytes = vec![0u8; self.dimension];
        reader.fill(&mut bytes);

        let mut vector: Vec<f32> = bytes
            .into_iter()
            .map(|b| (f32::from(b) / 255.0) - 0.5)
            .collect();

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn model_name(&self) -> &str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}
