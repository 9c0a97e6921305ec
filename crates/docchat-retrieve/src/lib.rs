//! # docchat-retrieve
//!
//! A thin retrieval layer over a [`VectorIndex`]: embed the query, search
//! with the session's pinned top-k and score threshold, hand back scored
//! chunks. The k/threshold pair is configuration fixed at session start,
//! not constants buried in the search call.

use docchat_core::{Error, RetrieverConfig, ScoredChunk, VectorIndex};
use docchat_embed::EmbedderPool;
use std::sync::Arc;
use tracing::debug;

/// Retrieves the most relevant chunks for a query.
pub struct Retriever {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<EmbedderPool>,
    config: RetrieverConfig,
}

impl Retriever {
    /// Create a retriever over an index with pinned parameters.
    pub fn new(
        index: Arc<dyn VectorIndex>,
        embedder: Arc<EmbedderPool>,
        config: RetrieverConfig,
    ) -> Self {
        Self {
            index,
            embedder,
            config,
        }
    }

    /// The pinned retrieval parameters.
    #[must_use]
    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Retrieve the top chunks for a query.
    ///
    /// At most `top_k` results, each scoring at least `score_threshold`;
    /// an empty result is a valid outcome, not an error.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>, Error> {
        let embedding = self.embedder.embed_query(query).await?;
        let results = self
            .index
            .search(&embedding, self.config.top_k, self.config.score_threshold)
            .await?;

        debug!(
            results = results.len(),
            top_k = self.config.top_k,
            threshold = self.config.score_threshold,
            "retrieved"
        );
        Ok(results)
    }
}
