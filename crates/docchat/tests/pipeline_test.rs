//! Integration tests for the full docchat pipeline.
//!
//! Tests the complete flow: extract → chunk → embed → index → retrieve →
//! compose → answer, with a scripted chat model standing in for the Ollama
//! runtime and the deterministic hash embedder.

use async_trait::async_trait;
use docchat_core::{
    ChunkConfig, ContextPolicy, DocumentSource, Error, ModelError, RetrieverConfig,
};
use docchat_embed::{EmbedderPool, HashEmbedder};
use docchat_extract::LoaderRegistry;
use docchat_llm::{ChatModel, ChatRequest, ModelProvider};
use docchat_session::{Assistant, AssistantConfig};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Chat model that records every prompt it receives and replies with a
/// fixed text, so tests can assert on exactly what reached the model.
struct ScriptedModel {
    id: String,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn model_id(&self) -> &str {
        &self.id
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ModelError> {
        let prompt = request.messages.last().unwrap().content.clone();
        self.prompts.lock().unwrap().push(prompt);
        Ok(format!("answer from {}", self.id))
    }
}

struct ScriptedProvider {
    prompts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self, id: &str) -> Arc<dyn ChatModel> {
        Arc::new(ScriptedModel {
            id: id.to_string(),
            prompts: Arc::clone(&self.prompts),
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, ModelError> {
        Ok(vec!["mistral".to_string()])
    }
}

struct Pipeline {
    assistant: Assistant,
    prompts: Arc<Mutex<Vec<String>>>,
    dir: TempDir,
}

fn pipeline(config: AssistantConfig) -> Pipeline {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let provider = Arc::new(ScriptedProvider {
        prompts: Arc::clone(&prompts),
    });
    let embedder = Arc::new(EmbedderPool::new(Arc::new(HashEmbedder::new()), 4));

    let assistant = Assistant::new(
        LoaderRegistry::with_defaults().unwrap(),
        embedder,
        provider,
        "mistral",
        config,
    )
    .unwrap();

    Pipeline {
        assistant,
        prompts,
        dir: tempfile::tempdir().unwrap(),
    }
}

fn write_doc(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn last_prompt(prompts: &Arc<Mutex<Vec<String>>>) -> String {
    prompts.lock().unwrap().last().cloned().expect("no prompt recorded")
}

#[tokio::test]
async fn test_full_pipeline_ingest_and_answer() {
    let mut p = pipeline(AssistantConfig::default());

    let sentences = [
        "Neural networks are inspired by the structure of the human brain.",
        "SQL is used for querying relational databases.",
        "OAuth2 is a popular authentication protocol.",
    ];
    let path = write_doc(&p.dir, "notes.txt", &sentences.join("\n\n"));

    let chunks = p
        .assistant
        .ingest(&DocumentSource::file(&path))
        .await
        .unwrap();
    assert!(chunks >= 1, "should index at least one chunk");
    assert!(p.assistant.has_index());

    // With deterministic embeddings, asking with the exact document text
    // guarantees a retrieval hit above the threshold.
    let doc_text = sentences.join("\n\n");
    let answer = p.assistant.ask(&doc_text).await.unwrap();

    assert_eq!(answer, "answer from mistral");
    let prompt = last_prompt(&p.prompts);
    assert!(prompt.contains("Context:"), "prompt should carry context");
    assert!(prompt.contains("Neural networks"), "retrieved chunk should be in the prompt");
}

#[tokio::test]
async fn test_ingest_reports_expected_chunk_count() {
    let config = AssistantConfig {
        chunking: ChunkConfig {
            chunk_size: 1024,
            overlap: 0,
        },
        ..Default::default()
    };
    let mut p = pipeline(config);

    // 3000 boundary-free characters split as 1024 + 1024 + 952.
    let path = write_doc(&p.dir, "big.txt", &"a".repeat(3000));

    let chunks = p
        .assistant
        .ingest(&DocumentSource::file(&path))
        .await
        .unwrap();

    assert_eq!(chunks, 3);
}

#[tokio::test]
async fn test_degraded_mode_before_ingest() {
    let mut p = pipeline(AssistantConfig::default());

    let answer = p.assistant.ask("hello").await.unwrap();

    assert!(!answer.is_empty());
    let prompt = last_prompt(&p.prompts);
    assert!(prompt.contains("Question: hello"));
    assert!(!prompt.contains("Context:"), "no context exists yet");
}

#[tokio::test]
async fn test_unrelated_query_degrades_to_conversation() {
    let mut p = pipeline(AssistantConfig::default());
    let path = write_doc(&p.dir, "doc.txt", "the quick brown fox jumps over the lazy dog");
    p.assistant
        .ingest(&DocumentSource::file(&path))
        .await
        .unwrap();

    // Hash embeddings of unrelated text stay far below the 0.5 threshold,
    // so retrieval comes back empty and composition degrades.
    p.assistant.ask("completely unrelated question").await.unwrap();

    let prompt = last_prompt(&p.prompts);
    assert!(!prompt.contains("brown fox"));
}

#[tokio::test]
async fn test_conversation_context_carries_between_turns() {
    let mut p = pipeline(AssistantConfig::default());

    p.assistant.ask("remember the number 42").await.unwrap();
    p.assistant.ask("what number did I mention?").await.unwrap();

    let prompt = last_prompt(&p.prompts);
    assert!(prompt.contains("remember the number 42"));
}

#[tokio::test]
async fn test_conversation_window_bounds_context() {
    let config = AssistantConfig {
        conversation_window: 2,
        ..Default::default()
    };
    let mut p = pipeline(config);

    p.assistant.ask("first turn marker").await.unwrap();
    p.assistant.ask("second turn marker").await.unwrap();
    p.assistant.ask("third turn marker").await.unwrap();

    // Window of 2 keeps only the last question/answer pair; the first turn
    // has scrolled out.
    let prompt = last_prompt(&p.prompts);
    assert!(!prompt.contains("first turn marker"));
}

#[tokio::test]
async fn test_reingest_same_source_is_idempotent() {
    let mut p = pipeline(AssistantConfig::default());
    let path = write_doc(&p.dir, "doc.txt", "alpha beta gamma delta");

    let first = p
        .assistant
        .ingest(&DocumentSource::file(&path))
        .await
        .unwrap();
    p.assistant.ask("alpha beta gamma delta").await.unwrap();
    let prompt_first = last_prompt(&p.prompts);

    let second = p
        .assistant
        .ingest(&DocumentSource::file(&path))
        .await
        .unwrap();
    p.assistant.ask("alpha beta gamma delta").await.unwrap();
    let prompt_second = last_prompt(&p.prompts);

    assert_eq!(first, second);
    assert_eq!(prompt_first, prompt_second);
}

#[tokio::test]
async fn test_clear_then_fresh_session_behavior() {
    let mut p = pipeline(AssistantConfig::default());
    let path = write_doc(&p.dir, "doc.txt", "indexed content here");
    p.assistant
        .ingest(&DocumentSource::file(&path))
        .await
        .unwrap();
    p.assistant.ask("indexed content here").await.unwrap();

    p.assistant.clear();

    // Behaves like the pre-ingest state.
    p.assistant.ask("indexed content here").await.unwrap();
    let prompt = last_prompt(&p.prompts);
    assert!(!prompt.contains("Context: indexed content"));

    // A fresh ingest then answers again.
    p.assistant
        .ingest(&DocumentSource::file(&path))
        .await
        .unwrap();
    p.assistant.ask("indexed content here").await.unwrap();
    let prompt = last_prompt(&p.prompts);
    assert!(prompt.contains("Context: indexed content here"));
}

#[tokio::test]
async fn test_failed_ingest_preserves_previous_index() {
    let mut p = pipeline(AssistantConfig::default());
    let good = write_doc(&p.dir, "good.txt", "useful indexed text");
    p.assistant
        .ingest(&DocumentSource::file(&good))
        .await
        .unwrap();

    let result = p
        .assistant
        .ingest(&DocumentSource::file("/no/such/file.txt"))
        .await;
    assert!(matches!(result, Err(Error::Extraction(_))));

    let sources = p.assistant.list_sources().await;
    assert_eq!(sources.len(), 1);
    assert!(sources[0].ends_with("good.txt"));
}

#[tokio::test]
async fn test_both_policy_mixes_retrieval_and_conversation() {
    let config = AssistantConfig {
        context_policy: ContextPolicy::Both,
        ..Default::default()
    };
    let mut p = pipeline(config);
    let path = write_doc(&p.dir, "doc.txt", "facts live in documents");
    p.assistant
        .ingest(&DocumentSource::file(&path))
        .await
        .unwrap();

    p.assistant.ask("small talk first").await.unwrap();
    p.assistant.ask("facts live in documents").await.unwrap();

    let prompt = last_prompt(&p.prompts);
    assert!(prompt.contains("facts live in documents"));
    assert!(prompt.contains("small talk first"));
}

#[tokio::test]
async fn test_retriever_threshold_config_is_honored() {
    // Threshold above 1.0 rejects even exact matches.
    let config = AssistantConfig {
        retrieval: RetrieverConfig {
            top_k: 3,
            score_threshold: 1.5,
        },
        ..Default::default()
    };
    let mut p = pipeline(config);
    let path = write_doc(&p.dir, "doc.txt", "exact text to query");
    p.assistant
        .ingest(&DocumentSource::file(&path))
        .await
        .unwrap();

    p.assistant.ask("exact text to query").await.unwrap();

    // Nothing cleared the threshold, so the chunk never reached the prompt
    // and the call still succeeded.
    let prompt = last_prompt(&p.prompts);
    assert!(!prompt.contains("Context: exact text"));
}

#[tokio::test]
async fn test_markdown_file_is_supported() {
    let mut p = pipeline(AssistantConfig::default());
    let path = write_doc(&p.dir, "readme.md", "# Title\n\nBody paragraph.");

    let chunks = p
        .assistant
        .ingest(&DocumentSource::file(&path))
        .await
        .unwrap();
    assert_eq!(chunks, 1);
}
