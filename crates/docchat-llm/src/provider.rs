//! Chat model traits.

use async_trait::async_trait;
use docchat_core::ModelError;
use std::sync::Arc;

use crate::types::ChatRequest;

/// A chat model bound to one model identity.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// The model identifier this instance answers as.
    fn model_id(&self) -> &str;

    /// Run a non-streaming chat completion.
    async fn chat(&self, request: ChatRequest) -> Result<String, ModelError>;
}

/// A backend that can construct chat models by identifier and enumerate
/// what it serves.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g. "ollama").
    fn name(&self) -> &str;

    /// Construct a chat model for the given identifier.
    ///
    /// Construction is cheap and does not talk to the backend; a bad
    /// identifier surfaces on the first `chat` call.
    fn model(&self, id: &str) -> Arc<dyn ChatModel>;

    /// List the model identifiers the backend currently serves.
    async fn list_models(&self) -> Result<Vec<String>, ModelError>;
}
