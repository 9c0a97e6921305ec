//! Loader registry dispatching sources to the right extractor.

use docchat_core::{Document, DocumentLoader, DocumentSource, ExtractError};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::web::WebLoader;

/// Registry of document loaders, keyed by file extension, plus the web
/// loader for URL sources.
pub struct LoaderRegistry {
    /// Named loaders
    loaders: HashMap<String, Arc<dyn DocumentLoader>>,
    /// Extension to loader name mapping
    ext_mapping: HashMap<String, String>,
    /// URL handler
    web: WebLoader,
}

impl LoaderRegistry {
    /// Create a registry with no file loaders registered.
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            loaders: HashMap::new(),
            ext_mapping: HashMap::new(),
            web: WebLoader::new()?,
        })
    }

    /// Create a registry with the standard loaders (text, pdf).
    pub fn with_defaults() -> Result<Self, ExtractError> {
        let mut registry = Self::new()?;
        registry.register("text", crate::TextLoader::new());
        registry.register("pdf", crate::PdfLoader::new());
        Ok(registry)
    }

    /// Register a file loader under a name.
    pub fn register<L: DocumentLoader + 'static>(&mut self, name: &str, loader: L) {
        let loader = Arc::new(loader);
        for ext in loader.extensions() {
            self.ext_mapping.insert((*ext).to_string(), name.to_string());
        }
        self.loaders.insert(name.to_string(), loader);
    }

    /// Get the loader for a file path, by extension.
    #[must_use]
    pub fn get_for_path(&self, path: &Path) -> Option<Arc<dyn DocumentLoader>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)?;

        if let Some(loader) = self
            .ext_mapping
            .get(&ext)
            .and_then(|name| self.loaders.get(name))
        {
            return Some(Arc::clone(loader));
        }

        // Fall back to asking each loader directly
        self.loaders
            .values()
            .find(|loader| loader.can_load(path))
            .cloned()
    }

    /// Extract documents from a source.
    ///
    /// File sources are dispatched by extension; a missing loader surfaces
    /// [`ExtractError::UnsupportedFormat`]. URL sources go through the web
    /// loader.
    pub async fn extract(&self, source: &DocumentSource) -> Result<Vec<Document>, ExtractError> {
        match source {
            DocumentSource::File { path } => {
                let loader = self.get_for_path(path).ok_or_else(|| {
                    ExtractError::UnsupportedFormat(
                        source
                            .extension()
                            .unwrap_or_else(|| path.to_string_lossy().into_owned()),
                    )
                })?;
                loader.load(path).await
            }
            DocumentSource::Url { url } => self.web.fetch(url).await,
        }
    }
}
