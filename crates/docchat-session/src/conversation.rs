//! Rolling conversation state.

use docchat_core::ConversationTurn;

/// Session transcript with a bounded rolling context window.
///
/// The full transcript is kept for the session; only the last N turns feed
/// prompt composition.
#[derive(Debug, Default)]
pub struct ConversationState {
    turns: Vec<ConversationTurn>,
}

impl ConversationState {
    /// Default number of turns fed into prompts.
    pub const DEFAULT_WINDOW: usize = 5;

    /// Empty conversation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to the transcript.
    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// The last `window` turn texts, concatenated in chronological order.
    ///
    /// Empty string when the transcript is empty.
    #[must_use]
    pub fn recent_context(&self, window: usize) -> String {
        let start = self.turns.len().saturating_sub(window);
        self.turns[start..]
            .iter()
            .map(|turn| turn.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Drop the whole transcript.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    /// Number of turns recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turns are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The full transcript, oldest first.
    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }
}
