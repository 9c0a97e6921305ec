//! Plain-text content loader.

use async_trait::async_trait;
use docchat_core::{Document, DocumentLoader, ExtractError};
use std::path::Path;
use tokio::fs;

/// Loader for plain text and markdown files.
pub struct TextLoader;

impl TextLoader {
    /// Create a new text loader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentLoader for TextLoader {
    fn extensions(&self) -> &[&str] {
        &["txt", "md", "markdown"]
    }

    async fn load(&self, path: &Path) -> Result<Vec<Document>, ExtractError> {
        let text = fs::read_to_string(path).await?;
        if text.trim().is_empty() {
            return Ok(vec![]);
        }

        Ok(vec![Document::new(text)
            .with_metadata("origin", path.to_string_lossy())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_text_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Some notes about Rust.").unwrap();

        let loader = TextLoader::new();
        let docs = loader.load(&path).await.unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "Some notes about Rust.");
        assert_eq!(
            docs[0].metadata.get("origin").unwrap(),
            &path.to_string_lossy().to_string()
        );
    }

    #[tokio::test]
    async fn test_load_empty_file_yields_no_documents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "   \n").unwrap();

        let loader = TextLoader::new();
        let docs = loader.load(&path).await.unwrap();

        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let loader = TextLoader::new();
        let result = loader.load(Path::new("/definitely/not/here.txt")).await;
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }

    #[test]
    fn test_extensions() {
        let loader = TextLoader::new();
        assert!(loader.extensions().contains(&"txt"));
        assert!(loader.extensions().contains(&"md"));
    }
}
