//! # docchat-llm
//!
//! Language-model invocation for docchat.
//!
//! [`ChatModel`] is one model identity that can run completions;
//! [`ModelProvider`] constructs models by identifier string and enumerates
//! what the backend serves. [`OllamaProvider`] implements both against an
//! Ollama runtime's HTTP API. Invocation failures surface as
//! [`docchat_core::ModelError`] per call and never corrupt session state.

pub mod ollama;
pub mod provider;
pub mod types;

pub use ollama::{OllamaChat, OllamaProvider};
pub use provider::{ChatModel, ModelProvider};
pub use types::{ChatMessage, ChatRequest};
