//! Core types for docchat.
//!
//! This module contains the shared data structures used across the pipeline:
//!
//! ## Ingestion
//! - [`DocumentSource`]: A file path or URL to ingest
//! - [`Document`]: Extracted text with source metadata
//! - [`Chunk`]: A bounded text window derived from a document
//! - [`ChunkMetadata`] / [`MetadataValue`]: Flat, scalar-only chunk metadata
//!
//! ## Index & Search
//! - [`IndexEntry`]: A chunk paired with its embedding vector
//! - [`ScoredChunk`]: A search hit with its similarity score
//!
//! ## Session
//! - [`ConversationTurn`]: One utterance in the session transcript
//! - [`ContextPolicy`]: Which context feeds prompt composition
//!
//! ## Configuration
//! - [`ChunkConfig`]: Window size and overlap for splitting
//! - [`RetrieverConfig`]: Top-k and score threshold for retrieval

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::ChunkError;

// ============================================================================
// Sources & Documents
// ============================================================================

/// A raw input to ingest: a local file or a web page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DocumentSource {
    /// Local file, dispatched by extension
    File { path: PathBuf },
    /// Web page, fetched over HTTP
    Url { url: String },
}

impl DocumentSource {
    /// Build a file source from a path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Build a URL source.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url { url: url.into() }
    }

    /// Stable identifier recorded as chunk `origin` metadata.
    #[must_use]
    pub fn origin(&self) -> String {
        match self {
            Self::File { path } => path.to_string_lossy().into_owned(),
            Self::Url { url } => url.clone(),
        }
    }

    /// Lowercased file extension, if this is a file source.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        match self {
            Self::File { path } => path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase),
            Self::Url { .. } => None,
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path } => write!(f, "{}", path.display()),
            Self::Url { url } => write!(f, "{url}"),
        }
    }
}

/// A unit of extracted text with its source metadata.
///
/// Produced by loaders, consumed by the chunker. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Extracted text content
    pub text: String,
    /// Source metadata (origin, title, page, ...)
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// Create a document with no metadata.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry, builder-style.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// Chunk metadata
// ============================================================================

/// A scalar metadata value.
///
/// The index requires flat metadata, so this is the only value shape a
/// [`ChunkMetadata`] can hold. Nested structures are dropped at construction
/// by [`ChunkMetadata::flatten`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<usize> for MetadataValue {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for MetadataValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Flat, scalar-only metadata attached to a chunk.
///
/// Validated at construction: every entry is a [`MetadataValue`], so a chunk
/// can never carry a nested structure into the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata(BTreeMap<String, MetadataValue>);

impl ChunkMetadata {
    /// Empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an arbitrary JSON object, keeping scalar values only.
    ///
    /// Arrays, objects and nulls are dropped. This is the sanctioned path
    /// for metadata of unknown shape.
    #[must_use]
    pub fn flatten(value: &serde_json::Value) -> Self {
        let mut out = BTreeMap::new();
        if let Some(map) = value.as_object() {
            for (key, val) in map {
                let scalar = match val {
                    serde_json::Value::String(s) => Some(MetadataValue::Text(s.clone())),
                    serde_json::Value::Bool(b) => Some(MetadataValue::Bool(*b)),
                    serde_json::Value::Number(n) => {
                        if let Some(i) = n.as_i64() {
                            Some(MetadataValue::Int(i))
                        } else {
                            n.as_f64().map(MetadataValue::Float)
                        }
                    }
                    _ => None,
                };
                if let Some(scalar) = scalar {
                    out.insert(key.clone(), scalar);
                }
            }
        }
        Self(out)
    }

    /// Insert a scalar value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.get(key)
    }

    /// Look up a value as text, if it is one.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(MetadataValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetadataValue)> {
        self.0.iter()
    }
}

// ============================================================================
// Chunks & index entries
// ============================================================================

/// A bounded text window derived from a document, the unit of indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Window text
    pub text: String,
    /// Flat metadata (origin, title, page, chunk ordinal, source tag)
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Create a chunk with empty metadata.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: ChunkMetadata::new(),
        }
    }

    /// Create a chunk with the given metadata.
    #[must_use]
    pub fn with_metadata(text: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// A chunk paired with its embedding vector.
///
/// Owned exclusively by the index: created at build, dropped on replace or
/// clear.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

impl IndexEntry {
    #[must_use]
    pub fn new(chunk: Chunk, embedding: Vec<f32>) -> Self {
        Self { chunk, embedding }
    }
}

/// A search hit: a chunk and its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

// ============================================================================
// Conversation
// ============================================================================

/// One utterance in the session transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// What was said
    pub text: String,
    /// True for the user, false for the assistant
    pub from_user: bool,
}

impl ConversationTurn {
    /// A user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from_user: true,
        }
    }

    /// An assistant turn.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from_user: false,
        }
    }
}

/// Which context feeds prompt composition when an index is available.
///
/// Without an index (or when nothing clears the score threshold) the session
/// always falls back to conversation context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextPolicy {
    /// Retrieved chunks only (default)
    #[default]
    RetrievalOnly,
    /// Rolling conversation window only
    ConversationOnly,
    /// Retrieved chunks followed by the conversation window
    Both,
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the character chunker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum characters per chunk
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            overlap: 0,
        }
    }
}

impl ChunkConfig {
    /// Reject configurations that cannot terminate.
    ///
    /// `overlap` must be strictly less than `chunk_size`, and `chunk_size`
    /// must be non-zero. Never clamped.
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.chunk_size == 0 {
            return Err(ChunkError::InvalidConfig(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(ChunkError::InvalidConfig(format!(
                "overlap ({}) must be less than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Configuration for the retriever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Maximum results per query
    pub top_k: usize,
    /// Minimum similarity score for a result to count
    pub score_threshold: f32,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            score_threshold: 0.5,
        }
    }
}
