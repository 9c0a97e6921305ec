//! Configuration handling for the docchat CLI.

use directories::ProjectDirs;
use docchat_core::{ChunkConfig, ContextPolicy, RetrieverConfig};
use docchat_session::AssistantConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Ollama runtime configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Embedding backend configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Conversation configuration
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Prompt composition configuration
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ollama runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the Ollama HTTP API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chat model identifier
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_chat_model() -> String {
    "mistral".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_model: default_chat_model(),
        }
    }
}

/// Embedding backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Backend: "hash" (offline, deterministic) or "ollama"
    #[serde(default = "default_embed_backend")]
    pub backend: String,

    /// Embedding model identifier (ollama backend only)
    #[serde(default = "default_embed_model")]
    pub model: String,

    /// Embedding dimension
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Max concurrent embedding requests
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_embed_backend() -> String {
    "hash".to_string()
}

fn default_embed_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_dimension() -> usize {
    384
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: default_embed_backend(),
            model: default_embed_model(),
            dimension: default_dimension(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// Chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Max characters per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    #[serde(default)]
    pub overlap: usize,
}

fn default_chunk_size() -> usize {
    1024
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: 0,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Max results per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum similarity score
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,
}

fn default_top_k() -> usize {
    3
}

fn default_score_threshold() -> f32 {
    0.5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            score_threshold: default_score_threshold(),
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Turns of history fed into prompts
    #[serde(default = "default_window")]
    pub window: usize,
}

fn default_window() -> usize {
    5
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
        }
    }
}

/// Prompt composition settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PromptConfig {
    /// Which context feeds composition: retrieval_only, conversation_only, both
    #[serde(default)]
    pub context_policy: ContextPolicy,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse; otherwise the XDG config file
    /// is used when present, and defaults apply when it is not.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => config_dir().map(|dir| dir.join("config.toml")).filter(|p| p.exists()),
        };

        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)?;
                let config = toml::from_str(&raw)?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// The session configuration this resolves to.
    pub fn assistant_config(&self) -> AssistantConfig {
        AssistantConfig {
            chunking: ChunkConfig {
                chunk_size: self.chunking.chunk_size,
                overlap: self.chunking.overlap,
            },
            retrieval: RetrieverConfig {
                top_k: self.retrieval.top_k,
                score_threshold: self.retrieval.score_threshold,
            },
            context_policy: self.prompt.context_policy,
            conversation_window: self.conversation.window,
            source_tag: "docchat".to_string(),
        }
    }

    /// Serialized default configuration, for `config init`.
    pub fn sample() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// XDG config directory for docchat.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("DOCCHAT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }

    ProjectDirs::from("", "", "docchat").map(|dirs| dirs.config_dir().to_path_buf())
}
