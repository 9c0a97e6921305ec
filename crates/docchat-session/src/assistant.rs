//! The assistant facade.
//!
//! Owns the whole session: loaders, chunker, embedder, the current index
//! and retriever (if anything was ingested), the active chat model, and the
//! conversation transcript. External callers interact only through
//! `ingest` / `ask` / `set_model` / `clear` / `list_sources`.

use std::sync::Arc;

use docchat_chunker::CharacterChunker;
use docchat_core::{
    ChunkConfig, ContextPolicy, ConversationTurn, DocumentSource, Error, IndexEntry, ModelError,
    RetrieverConfig, VectorIndex,
};
use docchat_embed::EmbedderPool;
use docchat_extract::LoaderRegistry;
use docchat_llm::{ChatModel, ModelProvider};
use docchat_retrieve::Retriever;
use docchat_store::MemoryIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::composer::PromptComposer;
use crate::conversation::ConversationState;

/// Session-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Chunking parameters
    pub chunking: ChunkConfig,
    /// Retrieval parameters pinned at session start
    pub retrieval: RetrieverConfig,
    /// Which context feeds prompt composition
    pub context_policy: ContextPolicy,
    /// Turns of conversation fed into prompts
    pub conversation_window: usize,
    /// Tag injected into every chunk's metadata at ingest
    pub source_tag: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkConfig::default(),
            retrieval: RetrieverConfig::default(),
            context_policy: ContextPolicy::default(),
            conversation_window: ConversationState::DEFAULT_WINDOW,
            source_tag: "docchat".to_string(),
        }
    }
}

/// The index and its retriever, installed together or not at all.
struct ActiveIndex {
    index: Arc<dyn VectorIndex>,
    retriever: Retriever,
}

/// Top-level session object coordinating the pipeline.
///
/// One assistant owns one index and one conversation; operations take
/// `&mut self`, so one ingest or query runs to completion before the next.
pub struct Assistant {
    loaders: LoaderRegistry,
    chunker: CharacterChunker,
    embedder: Arc<EmbedderPool>,
    provider: Arc<dyn ModelProvider>,
    model: Arc<dyn ChatModel>,
    composer: PromptComposer,
    conversation: ConversationState,
    active: Option<ActiveIndex>,
    config: AssistantConfig,
}

impl Assistant {
    /// Create an assistant with no ingested content.
    ///
    /// Fails with `InvalidConfig` when the chunking configuration cannot
    /// terminate.
    pub fn new(
        loaders: LoaderRegistry,
        embedder: Arc<EmbedderPool>,
        provider: Arc<dyn ModelProvider>,
        model_id: &str,
        config: AssistantConfig,
    ) -> Result<Self, Error> {
        let chunker = CharacterChunker::new(config.chunking.clone())?;
        let model = provider.model(model_id);

        Ok(Self {
            loaders,
            chunker,
            embedder,
            provider,
            model,
            composer: PromptComposer::new(config.context_policy),
            conversation: ConversationState::new(),
            active: None,
            config,
        })
    }

    /// Ingest a source, replacing any existing index.
    ///
    /// All-or-nothing: the new index and retriever are installed in one
    /// assignment only after extraction, chunking, and embedding all
    /// succeeded. Any failure leaves the previous index untouched.
    ///
    /// Returns the number of chunks indexed.
    pub async fn ingest(&mut self, source: &DocumentSource) -> Result<usize, Error> {
        info!(%source, "ingesting");

        let documents = self.loaders.extract(source).await?;
        debug!(documents = documents.len(), "extracted");

        let mut chunks = self.chunker.split(&documents);
        for chunk in &mut chunks {
            chunk.metadata.insert("tag", self.config.source_tag.clone());
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry::new(chunk, embedding))
            .collect();
        let count = entries.len();

        let index: Arc<dyn VectorIndex> = Arc::new(MemoryIndex::new());
        index.replace(entries).await?;
        let retriever = Retriever::new(
            Arc::clone(&index),
            Arc::clone(&self.embedder),
            self.config.retrieval.clone(),
        );

        // The previous generation is dropped here, in one step.
        self.active = Some(ActiveIndex { index, retriever });

        info!(chunks = count, "ingest complete");
        Ok(count)
    }

    /// Answer a question.
    ///
    /// Retrieves context when an index exists; with no index, or nothing
    /// above the score threshold, falls back to conversation context. The
    /// turn pair is appended to the transcript only on success, so a failed
    /// call can be retried cleanly.
    pub async fn ask(&mut self, query: &str) -> Result<String, Error> {
        let retrieved = match &self.active {
            Some(active) => Some(active.retriever.retrieve(query).await?),
            None => None,
        };

        let conversation = self
            .conversation
            .recent_context(self.config.conversation_window);
        let request = self
            .composer
            .compose(query, retrieved.as_deref(), &conversation);

        let answer = self.model.chat(request).await?;

        self.conversation.append(ConversationTurn::user(query));
        self.conversation.append(ConversationTurn::assistant(&answer));

        Ok(answer)
    }

    /// Switch the active model.
    ///
    /// The index is preserved; the conversation is reset.
    pub fn set_model(&mut self, model_id: &str) {
        info!(model = model_id, "switching model");
        self.model = self.provider.model(model_id);
        self.conversation.reset();
    }

    /// Drop the index, retriever, and conversation. The model stays.
    pub fn clear(&mut self) {
        info!("clearing session");
        self.active = None;
        self.conversation.reset();
    }

    /// Distinct origins currently indexed.
    pub async fn list_sources(&self) -> Vec<String> {
        match &self.active {
            Some(active) => active.index.sources().await,
            None => Vec::new(),
        }
    }

    /// Model identifiers the backend currently serves.
    pub async fn list_models(&self) -> Result<Vec<String>, ModelError> {
        self.provider.list_models().await
    }

    /// The active model identifier.
    #[must_use]
    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// Whether anything is currently indexed.
    #[must_use]
    pub fn has_index(&self) -> bool {
        self.active.is_some()
    }

    /// The session transcript.
    #[must_use]
    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docchat_embed::HashEmbedder;
    use docchat_llm::ChatRequest;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Model that replies with a fixed text and records the last request.
    struct ScriptedModel {
        id: String,
        last: Arc<Mutex<Option<ChatRequest>>>,
        fail: bool,
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        fn model_id(&self) -> &str {
            &self.id
        }

        async fn chat(&self, request: ChatRequest) -> Result<String, ModelError> {
            *self.last.lock().unwrap() = Some(request);
            if self.fail {
                return Err(ModelError::Unreachable("scripted outage".to_string()));
            }
            Ok(format!("answer from {}", self.id))
        }
    }

    struct FakeProvider {
        last: Arc<Mutex<Option<ChatRequest>>>,
        fail: bool,
    }

    #[async_trait]
    impl ModelProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        fn model(&self, id: &str) -> Arc<dyn ChatModel> {
            Arc::new(ScriptedModel {
                id: id.to_string(),
                last: Arc::clone(&self.last),
                fail: self.fail,
            })
        }

        async fn list_models(&self) -> Result<Vec<String>, ModelError> {
            Ok(vec!["mistral".to_string(), "llama2".to_string()])
        }
    }

    struct Fixture {
        assistant: Assistant,
        last_request: Arc<Mutex<Option<ChatRequest>>>,
        _dir: TempDir,
        doc_path: std::path::PathBuf,
    }

    const DOC_TEXT: &str = "the borrow checker enforces aliasing rules";

    fn fixture_with(fail: bool, config: AssistantConfig) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let doc_path = dir.path().join("doc.txt");
        std::fs::write(&doc_path, DOC_TEXT).unwrap();

        let last = Arc::new(Mutex::new(None));
        let provider = Arc::new(FakeProvider {
            last: Arc::clone(&last),
            fail,
        });
        let embedder = Arc::new(EmbedderPool::new(Arc::new(HashEmbedder::new()), 2));

        let assistant = Assistant::new(
            LoaderRegistry::with_defaults().unwrap(),
            embedder,
            provider,
            "mistral",
            config,
        )
        .unwrap();

        Fixture {
            assistant,
            last_request: last,
            _dir: dir,
            doc_path,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(false, AssistantConfig::default())
    }

    fn last_user_content(last: &Arc<Mutex<Option<ChatRequest>>>) -> String {
        let guard = last.lock().unwrap();
        let request = guard.as_ref().expect("model was not invoked");
        request.messages.last().unwrap().content.clone()
    }

    #[tokio::test]
    async fn test_ask_before_ingest_is_degraded_not_error() {
        let mut fx = fixture();

        let answer = fx.assistant.ask("hello").await.unwrap();

        assert!(!answer.is_empty());
        assert!(!fx.assistant.has_index());
        // Turn pair recorded
        assert_eq!(fx.assistant.conversation().len(), 2);
    }

    #[tokio::test]
    async fn test_degraded_mode_uses_conversation_context() {
        let mut fx = fixture();

        fx.assistant.ask("my name is Ada").await.unwrap();
        fx.assistant.ask("what is my name?").await.unwrap();

        let content = last_user_content(&fx.last_request);
        assert!(content.contains("my name is Ada"));
    }

    #[tokio::test]
    async fn test_ingest_then_ask_uses_retrieved_context() {
        let mut fx = fixture();

        let count = fx
            .assistant
            .ingest(&DocumentSource::file(&fx.doc_path))
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert!(fx.assistant.has_index());

        // Identical text embeds identically, so the chunk clears threshold.
        fx.assistant.ask(DOC_TEXT).await.unwrap();

        let content = last_user_content(&fx.last_request);
        assert!(content.contains("aliasing rules"));
    }

    #[tokio::test]
    async fn test_source_tag_and_origin_recorded() {
        let mut fx = fixture();
        fx.assistant
            .ingest(&DocumentSource::file(&fx.doc_path))
            .await
            .unwrap();

        let sources = fx.assistant.list_sources().await;
        assert_eq!(sources, vec![fx.doc_path.to_string_lossy().to_string()]);
    }

    #[tokio::test]
    async fn test_ingest_unsupported_format_leaves_index_intact() {
        let mut fx = fixture();
        fx.assistant
            .ingest(&DocumentSource::file(&fx.doc_path))
            .await
            .unwrap();

        let result = fx
            .assistant
            .ingest(&DocumentSource::file("/docs/spreadsheet.xlsx"))
            .await;
        assert!(result.is_err());

        // The previous index still answers.
        assert!(fx.assistant.has_index());
        assert_eq!(fx.assistant.list_sources().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_model_call_leaves_conversation_untouched() {
        let mut fx = fixture_with(true, AssistantConfig::default());

        let result = fx.assistant.ask("will fail").await;

        assert!(matches!(result, Err(Error::Model(_))));
        assert!(fx.assistant.conversation().is_empty());
    }

    #[tokio::test]
    async fn test_set_model_resets_conversation_preserves_index() {
        let mut fx = fixture();
        fx.assistant
            .ingest(&DocumentSource::file(&fx.doc_path))
            .await
            .unwrap();
        fx.assistant.ask("hi").await.unwrap();
        assert_eq!(fx.assistant.conversation().len(), 2);

        fx.assistant.set_model("llama2");

        assert_eq!(fx.assistant.model_id(), "llama2");
        assert!(fx.assistant.conversation().is_empty());
        assert!(fx.assistant.has_index());

        let answer = fx.assistant.ask("still there?").await.unwrap();
        assert!(answer.contains("llama2"));
    }

    #[tokio::test]
    async fn test_clear_restores_pre_ingest_behavior() {
        let mut fx = fixture();
        fx.assistant
            .ingest(&DocumentSource::file(&fx.doc_path))
            .await
            .unwrap();
        fx.assistant.ask("hi").await.unwrap();

        fx.assistant.clear();

        assert!(!fx.assistant.has_index());
        assert!(fx.assistant.conversation().is_empty());
        assert!(fx.assistant.list_sources().await.is_empty());

        // Degraded mode again, exactly like a fresh session.
        let answer = fx.assistant.ask("hello again").await.unwrap();
        assert!(!answer.is_empty());

        // And a fresh ingest works afterwards.
        let count = fx
            .assistant
            .ingest(&DocumentSource::file(&fx.doc_path))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_reingest_is_idempotent() {
        let mut fx = fixture();

        let first = fx
            .assistant
            .ingest(&DocumentSource::file(&fx.doc_path))
            .await
            .unwrap();
        fx.assistant.ask(DOC_TEXT).await.unwrap();
        let prompt_first = last_user_content(&fx.last_request);

        let second = fx
            .assistant
            .ingest(&DocumentSource::file(&fx.doc_path))
            .await
            .unwrap();
        fx.assistant.ask(DOC_TEXT).await.unwrap();
        let prompt_second = last_user_content(&fx.last_request);

        assert_eq!(first, second);
        assert_eq!(prompt_first, prompt_second);
    }

    #[tokio::test]
    async fn test_list_models_passthrough() {
        let fx = fixture();
        let models = fx.assistant.list_models().await.unwrap();
        assert_eq!(models, vec!["mistral", "llama2"]);
    }

    #[test]
    fn test_invalid_chunk_config_fails_construction() {
        let last = Arc::new(Mutex::new(None));
        let provider = Arc::new(FakeProvider { last, fail: false });
        let embedder = Arc::new(EmbedderPool::new(Arc::new(HashEmbedder::new()), 1));

        let config = AssistantConfig {
            chunking: ChunkConfig {
                chunk_size: 100,
                overlap: 100,
            },
            ..Default::default()
        };

        let result = Assistant::new(
            LoaderRegistry::with_defaults().unwrap(),
            embedder,
            provider,
            "mistral",
            config,
        );

        assert!(matches!(result, Err(Error::Chunking(_))));
    }
}
