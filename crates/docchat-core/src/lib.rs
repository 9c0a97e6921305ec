//! # docchat-core
//!
//! Core types and traits for docchat, a retrieval-augmented generation
//! assistant over local documents and web pages.
//!
//! This crate provides the foundational abstractions used throughout the
//! pipeline:
//!
//! - **Document loading**: [`DocumentLoader`] trait for extracting text from
//!   files
//! - **Chunking configuration**: [`ChunkConfig`] for the splitting stage
//! - **Embedding**: [`Embedder`] trait for converting text to vectors
//! - **Vector indexing**: [`VectorIndex`] trait for storage and similarity
//!   search
//!
//! ## Architecture
//!
//! The crate is organized around a pipeline pattern:
//!
//! ```text
//! Source → DocumentLoader → Chunker → Embedder → VectorIndex
//!                                                    ↓
//!                                     query → Retriever → prompt → model
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`DocumentSource`] | A file path or URL to ingest |
//! | [`Document`] | Extracted text with source metadata |
//! | [`Chunk`] | A bounded text window, the unit of indexing |
//! | [`IndexEntry`] | A chunk with its embedding vector |
//! | [`ScoredChunk`] | A search hit with similarity score |
//! | [`ConversationTurn`] | One utterance in the session transcript |

pub mod error;
pub mod traits;
pub mod types;

pub use error::{
    ChunkError, EmbedError, Error, ExtractError, IndexError, ModelError, Result,
};
pub use traits::{DocumentLoader, Embedder, VectorIndex};
pub use types::{
    Chunk, ChunkConfig, ChunkMetadata, ContextPolicy, ConversationTurn, Document, DocumentSource,
    IndexEntry, MetadataValue, RetrieverConfig, ScoredChunk,
};
