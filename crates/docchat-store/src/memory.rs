//! In-memory vector index.
//!
//! Brute-force cosine similarity over a single generation of entries. Good
//! for session-scoped indexes in the tens of thousands of chunks; swap in
//! another [`VectorIndex`] implementation beyond that.

use async_trait::async_trait;
use docchat_core::{IndexEntry, IndexError, ScoredChunk, VectorIndex};
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory vector index with atomic generation replacement.
///
/// [`replace`](VectorIndex::replace) installs a complete new entry set under
/// one write lock, so a concurrent search observes either the full old
/// generation or the full new one, never a mix.
pub struct MemoryIndex {
    entries: RwLock<Vec<IndexEntry>>,
}

impl MemoryIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Compute cosine similarity between two vectors.
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot / (norm_a * norm_b)
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn replace(&self, entries: Vec<IndexEntry>) -> Result<(), IndexError> {
        let count = entries.len();
        let mut guard = self.entries.write().await;
        *guard = entries;
        debug!("index replaced with {} entries", count);
        Ok(())
    }

    async fn search(
        &self,
        embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredChunk>, IndexError> {
        let entries = self.entries.read().await;

        let mut scored: Vec<(f32, &IndexEntry)> = entries
            .iter()
            .map(|entry| (Self::cosine_similarity(embedding, &entry.embedding), entry))
            .collect();

        // Sort by score descending
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .filter(|(score, _)| *score >= min_score)
            .take(limit)
            .map(|(score, entry)| ScoredChunk {
                chunk: entry.chunk.clone(),
                score,
            })
            .collect())
    }

    async fn clear(&self) -> Result<(), IndexError> {
        let mut guard = self.entries.write().await;
        let dropped = guard.len();
        guard.clear();
        debug!("index cleared ({} entries dropped)", dropped);
        Ok(())
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn sources(&self) -> Vec<String> {
        let entries = self.entries.read().await;
        let mut sources: Vec<String> = entries
            .iter()
            .filter_map(|entry| entry.chunk.metadata.get_text("origin"))
            .map(str::to_string)
            .collect();
        sources.sort();
        sources.dedup();
        sources
    }
}
