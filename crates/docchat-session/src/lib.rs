//! # docchat-session
//!
//! Session layer for docchat: the [`Assistant`] facade coordinating
//! extraction, chunking, embedding, indexing, retrieval, and model
//! invocation, plus the [`ConversationState`] transcript and the
//! [`PromptComposer`] that merges query and context into a chat request.
//!
//! The assistant is an explicit object handed to its host; there is no
//! process-wide session singleton. State machine:
//!
//! ```text
//! Uninitialized ──ingest──▶ Ready ──clear──▶ Uninitialized
//!       │                    │
//!       └───── ask ──────────┘        (set_model: any state, resets
//!         (degraded before ingest)     conversation, keeps index)
//! ```

pub mod assistant;
pub mod composer;
pub mod conversation;

pub use assistant::{Assistant, AssistantConfig};
pub use composer::PromptComposer;
pub use conversation::ConversationState;
