//! Prompt composition.
//!
//! One fixed template: persona and constraints up front, then the question
//! and whatever context the policy selects. With nothing retrieved (no
//! index yet, or nothing above the score threshold) composition degrades to
//! conversation context instead of failing.

use docchat_core::{ContextPolicy, ScoredChunk};
use docchat_llm::{ChatMessage, ChatRequest};

/// Instruction preamble sent as the system message.
const PERSONA: &str = "You are an assistant for answering questions. \
Use the following context clues to answer the question. \
If you don't know the answer, simply say that you don't know. \
Use a maximum of three sentences and be concise in your response.";

/// Builds chat requests from a query and the available context.
pub struct PromptComposer {
    policy: ContextPolicy,
}

impl PromptComposer {
    /// Create a composer with the given context policy.
    #[must_use]
    pub fn new(policy: ContextPolicy) -> Self {
        Self { policy }
    }

    /// The active policy.
    #[must_use]
    pub fn policy(&self) -> ContextPolicy {
        self.policy
    }

    /// Compose a chat request for a query.
    ///
    /// `retrieved` is `None` when no index exists; an empty slice means the
    /// index had nothing above the threshold. Both degrade to conversation
    /// context.
    #[must_use]
    pub fn compose(
        &self,
        query: &str,
        retrieved: Option<&[ScoredChunk]>,
        conversation: &str,
    ) -> ChatRequest {
        let retrieved_block = retrieved
            .filter(|chunks| !chunks.is_empty())
            .map(format_chunks);

        let context = match (self.policy, retrieved_block) {
            (ContextPolicy::ConversationOnly, _) | (_, None) => conversation.to_string(),
            (ContextPolicy::RetrievalOnly, Some(block)) => block,
            (ContextPolicy::Both, Some(block)) => {
                if conversation.is_empty() {
                    block
                } else {
                    format!("{block}\n\n{conversation}")
                }
            }
        };

        let user = if context.is_empty() {
            format!("Question: {query}")
        } else {
            format!("Question: {query}\nContext: {context}")
        };

        ChatRequest::new(vec![ChatMessage::system(PERSONA), ChatMessage::user(user)])
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(ContextPolicy::default())
    }
}

/// Join retrieved chunk texts into one context block.
fn format_chunks(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|scored| scored.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_core::Chunk;

    fn scored(text: &str, score: f32) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk::new(text),
            score,
        }
    }

    fn user_content(request: &ChatRequest) -> &str {
        &request.messages[1].content
    }

    #[test]
    fn test_system_message_carries_persona() {
        let request = PromptComposer::default().compose("q", None, "");
        assert_eq!(request.messages[0].role, "system");
        assert!(request.messages[0].content.contains("maximum of three sentences"));
    }

    #[test]
    fn test_retrieval_only_uses_chunks() {
        let composer = PromptComposer::new(ContextPolicy::RetrievalOnly);
        let chunks = vec![scored("chunk one", 0.9), scored("chunk two", 0.8)];

        let request = composer.compose("what?", Some(&chunks), "old conversation");
        let content = user_content(&request);

        assert!(content.contains("Question: what?"));
        assert!(content.contains("chunk one\n\nchunk two"));
        assert!(!content.contains("old conversation"));
    }

    #[test]
    fn test_no_index_degrades_to_conversation() {
        let composer = PromptComposer::new(ContextPolicy::RetrievalOnly);
        let request = composer.compose("hello", None, "hi\nhey there");

        let content = user_content(&request);
        assert!(content.contains("hi\nhey there"));
    }

    #[test]
    fn test_empty_retrieval_degrades_to_conversation() {
        let composer = PromptComposer::new(ContextPolicy::RetrievalOnly);
        let request = composer.compose("hello", Some(&[]), "earlier turn");

        assert!(user_content(&request).contains("earlier turn"));
    }

    #[test]
    fn test_conversation_only_ignores_chunks() {
        let composer = PromptComposer::new(ContextPolicy::ConversationOnly);
        let chunks = vec![scored("should not appear", 0.9)];

        let request = composer.compose("q", Some(&chunks), "the conversation");
        let content = user_content(&request);

        assert!(content.contains("the conversation"));
        assert!(!content.contains("should not appear"));
    }

    #[test]
    fn test_both_concatenates() {
        let composer = PromptComposer::new(ContextPolicy::Both);
        let chunks = vec![scored("retrieved text", 0.9)];

        let request = composer.compose("q", Some(&chunks), "spoken text");
        let content = user_content(&request);

        assert!(content.contains("retrieved text"));
        assert!(content.contains("spoken text"));
    }

    #[test]
    fn test_no_context_at_all_is_bare_question() {
        let request = PromptComposer::default().compose("just asking", None, "");
        assert_eq!(user_content(&request), "Question: just asking");
    }
}
