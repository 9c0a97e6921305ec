//! Error types for docchat.

use thiserror::Error;

/// Main error type for docchat operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Content extraction failed
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// Chunking failed
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkError),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),

    /// Vector index operation failed
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Language model invocation failed
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Content extraction errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// File extension or source kind has no registered loader
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Network failure retrieving URL content
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Parser failure on a recognized format
    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction failed: {0}")]
    Failed(String),
}

/// Chunking errors.
#[derive(Error, Debug)]
pub enum ChunkError {
    /// Misconfiguration (overlap >= chunk_size); fatal at construction
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("chunking failed: {0}")]
    Failed(String),
}

/// Embedding errors.
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("embedding request failed: {0}")]
    Http(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    Dimension { expected: usize, got: usize },
}

/// Vector index errors.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("insert failed: {0}")]
    Insert(String),

    #[error("query failed: {0}")]
    Query(String),
}

/// Language model errors.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Backend unreachable (connection refused, timeout)
    #[error("model backend unreachable: {0}")]
    Unreachable(String),

    /// Backend reachable but the call failed
    #[error("model invocation failed: {0}")]
    Invocation(String),

    /// Response arrived but could not be interpreted
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for docchat operations.
pub type Result<T> = std::result::Result<T, Error>;
