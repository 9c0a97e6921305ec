//! Fixed-size character chunking with overlap.

use docchat_core::{Chunk, ChunkConfig, ChunkError, ChunkMetadata, Document, MetadataValue};
use tracing::debug;

/// Character-window chunker with configurable overlap.
///
/// Windows are `chunk_size` characters stepped by `chunk_size - overlap`,
/// so consecutive chunks share exactly `overlap` characters. A window is
/// shortened to a paragraph, newline, or sentence boundary only when one
/// exists near its end; uniform text gets exact cuts.
pub struct CharacterChunker {
    config: ChunkConfig,
}

impl CharacterChunker {
    /// Create a chunker, rejecting non-terminating configurations.
    ///
    /// Fails with [`ChunkError::InvalidConfig`] when `overlap >= chunk_size`
    /// or `chunk_size == 0`.
    pub fn new(config: ChunkConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Split documents into chunks.
    ///
    /// Deterministic: the same documents and configuration always produce
    /// the same chunk sequence. Document metadata is carried into every
    /// chunk, plus a `chunk` ordinal within its document.
    #[must_use]
    pub fn split(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for document in documents {
            let windows = split_text(&document.text, self.config.chunk_size, self.config.overlap);
            debug!(
                windows = windows.len(),
                chars = document.text.chars().count(),
                "split document"
            );

            for (ordinal, window) in windows.into_iter().enumerate() {
                let mut metadata = ChunkMetadata::new();
                for (key, value) in &document.metadata {
                    metadata.insert(key.clone(), MetadataValue::Text(value.clone()));
                }
                metadata.insert("chunk", ordinal);
                chunks.push(Chunk::with_metadata(window, metadata));
            }
        }

        chunks
    }
}

/// Split text into overlapping character windows.
///
/// Each next window starts `overlap` characters before the previous one
/// ended, so consecutive windows share exactly `overlap` characters and no
/// character is skipped even when a window was shortened to a boundary.
fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    if total == 0 {
        return vec![];
    }

    let mut windows = Vec::new();
    let mut start = 0;

    while start < total {
        let target_end = (start + chunk_size).min(total);
        let end = find_break_point(&chars, start, target_end, total);

        windows.push(chars[start..end].iter().collect());

        if end >= total {
            break;
        }
        // max() guarantees forward progress for any valid configuration.
        start = end.saturating_sub(overlap).max(start + 1);
    }

    windows
}

/// Find a natural break point near the target end position.
///
/// Searches the final fifth of the window, preferring a paragraph break,
/// then a single newline, then a sentence end. Returns `target_end`
/// unchanged when no boundary exists there.
fn find_break_point(chars: &[char], start: usize, target_end: usize, total: usize) -> usize {
    if target_end >= total {
        return total;
    }

    let search_start = target_end.saturating_sub((target_end - start) / 5);

    // Prefer double newline (paragraph break)
    for i in (search_start..target_end.saturating_sub(1)).rev() {
        if chars[i] == '\n' && chars[i + 1] == '\n' {
            return i + 2;
        }
    }

    // Then single newline
    for i in (search_start..target_end).rev() {
        if chars[i] == '\n' {
            return i + 1;
        }
    }

    // Then sentence end followed by whitespace
    for i in (search_start..target_end).rev() {
        if matches!(chars[i], '.' | '!' | '?')
            && i + 1 < total
            && chars[i + 1].is_whitespace()
        {
            return i + 1;
        }
    }

    target_end
}
