//! # docchat-embed
//!
//! Embedding backends for docchat.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`HashEmbedder`] | Deterministic blake3-derived vectors, offline default |
//! | [`OllamaEmbedder`] | HTTP embeddings via an Ollama-compatible runtime |
//! | [`EmbedderPool`] | Semaphore-limited concurrency wrapper |
//!
//! Embedding is treated as a pure function from text to a fixed-length
//! vector; swapping backends never changes pipeline semantics.

pub mod hash;
pub mod ollama;
pub mod pool;

pub use hash::HashEmbedder;
pub use ollama::OllamaEmbedder;
pub use pool::EmbedderPool;
