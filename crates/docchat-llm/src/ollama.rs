//! Ollama chat provider.
//!
//! Talks to an Ollama runtime over its HTTP API: `/api/chat` for
//! completions and `/api/tags` for model enumeration.

use async_trait::async_trait;
use docchat_core::ModelError;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::provider::{ChatModel, ModelProvider};
use crate::types::ChatRequest;

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

fn map_send_error(e: reqwest::Error) -> ModelError {
    if e.is_connect() || e.is_timeout() {
        ModelError::Unreachable(e.to_string())
    } else {
        ModelError::Invocation(e.to_string())
    }
}

/// Provider for an Ollama runtime at a fixed base URL.
#[derive(Clone)]
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    /// Default local Ollama endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:11434";

    /// Create a provider against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| ModelError::Invocation(format!("http client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self, id: &str) -> Arc<dyn ChatModel> {
        Arc::new(OllamaChat {
            base_url: self.base_url.clone(),
            model: id.to_string(),
            client: self.client.clone(),
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, ModelError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::Invocation(format!("HTTP {status} listing models")));
        }

        let payload: TagsResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        Ok(payload.models.into_iter().map(|m| m.name).collect())
    }
}

/// A chat model bound to one Ollama model name.
pub struct OllamaChat {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[async_trait]
impl ChatModel for OllamaChat {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ModelError> {
        let url = format!("{}/api/chat", self.base_url);

        let mut body = json!({
            "model": self.model,
            "messages": request.messages,
            "stream": false,
        });
        if let Some(obj) = body.as_object_mut() {
            let mut options = serde_json::Map::new();
            if let Some(t) = request.temperature {
                options.insert("temperature".to_string(), json!(t));
            }
            if let Some(n) = request.max_tokens {
                options.insert("num_predict".to_string(), json!(n));
            }
            if !options.is_empty() {
                obj.insert("options".to_string(), options.into());
            }
        }

        debug!(model = %self.model, "chat completion");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ModelError::Invocation(format!("HTTP {status}: {text}")));
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        Ok(payload.message.content)
    }
}
