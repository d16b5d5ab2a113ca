//! Transcript — the ordered chat turns of one view.
//!
//! DESIGN
//! ======
//! Append-only: insertion order is display order, and nothing edits or
//! removes a turn once stored. A `Transcript` has exactly one owner (the
//! websocket connection task of its view), so it needs no locking.

use serde::{Deserialize, Serialize};

use crate::frame::Data;

// =============================================================================
// CHAT TURN
// =============================================================================

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One message in the transcript. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    sender: Sender,
    text: String,
}

impl ChatTurn {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { sender: Sender::User, text: text.into() }
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self { sender: Sender::Assistant, text: text.into() }
    }

    #[must_use]
    pub fn sender(&self) -> Sender {
        self.sender
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Frame payload for this turn at position `index`.
    #[must_use]
    pub fn to_data(&self, index: usize) -> Data {
        let mut data = Data::new();
        data.insert("index".into(), serde_json::json!(index));
        data.insert("sender".into(), serde_json::json!(self.sender));
        data.insert("text".into(), serde_json::json!(self.text));
        data
    }
}

// =============================================================================
// TRANSCRIPT
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return the index it landed at.
    pub fn append(&mut self, turn: ChatTurn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    /// Current sequence, oldest first.
    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;
