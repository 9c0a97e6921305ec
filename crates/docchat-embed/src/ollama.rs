//! Ollama HTTP embedder.

use async_trait::async_trait;
use docchat_core::{EmbedError, Embedder};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

/// Embedder backed by an Ollama-compatible `/api/embeddings` endpoint.
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    dimension: usize,
    client: reqwest::Client,
}

impl OllamaEmbedder {
    /// Create an embedder against the given base URL and model.
    ///
    /// `dimension` must match the model's output size; mismatched responses
    /// surface [`EmbedError::Dimension`] instead of poisoning the index.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self, EmbedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| EmbedError::Http(format!("http client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimension,
            client,
        })
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let url = format!("{}/api/embeddings", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": text,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbedError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(EmbedError::Http(format!("HTTP {status}: {text}")));
        }

        let payload: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::Inference(format!("bad embeddings payload: {e}")))?;

        if payload.embedding.len() != self.dimension {
            return Err(EmbedError::Dimension {
                expected: self.dimension,
                got: payload.embedding.len(),
            });
        }

        Ok(payload.embedding)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        debug!(count = texts.len(), model = %self.model, "embedding batch");

        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed_one(text).await?);
        }
        Ok(out)
    }
}
