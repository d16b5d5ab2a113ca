//! Chat service — the send pipeline.
//!
//! DESIGN
//! ======
//! Split in two so the caller controls where each half runs:
//! - [`accept`] validates input and appends the user turn. It is synchronous
//!   and runs on the thread that owns the transcript.
//! - [`complete`] performs the single completion call and always yields an
//!   assistant turn: the reply on success, [`FALLBACK_TEXT`] on any failure.
//!   It never touches the transcript, so it can run in a detached task.
//!
//! Only the latest user message is sent. No history, no retry.

use tracing::{debug, info, warn};

use crate::frame::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::types::{LlmError, Message};
use crate::transcript::{ChatTurn, Transcript};

/// Instruction sent as the system message on every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Assistant text shown when the completion call fails for any reason.
pub const FALLBACK_TEXT: &str = "Sorry, something went wrong.";

/// Append the user turn for `raw` unless it is blank.
///
/// The stored text is `raw` as typed; trimming only decides whether to send.
/// Returns the appended turn and its index, or `None` for blank input.
pub fn accept(transcript: &mut Transcript, raw: &str) -> Option<(usize, ChatTurn)> {
    if raw.trim().is_empty() {
        return None;
    }
    let turn = ChatTurn::user(raw);
    let index = transcript.append(turn.clone());
    Some((index, turn))
}

/// Request one completion for `text` and return the reply content.
///
/// # Errors
///
/// Returns the [`LlmError`] from the client unchanged.
pub async fn reply(llm: &dyn LlmChat, text: &str) -> Result<String, LlmError> {
    let messages = [Message::user(text)];
    let response = llm.chat(SYSTEM_PROMPT, &messages).await?;
    info!(model = %response.model, chars = response.content.len(), "chat: completion received");
    Ok(response.content)
}

/// Request one completion for `text` and turn the outcome into an assistant turn.
pub async fn complete(llm: &dyn LlmChat, text: &str) -> ChatTurn {
    match reply(llm, text).await {
        Ok(content) => ChatTurn::assistant(content),
        Err(e) => {
            warn!(code = e.error_code(), error = %e, "chat: completion failed");
            if let LlmError::ApiResponse { body, .. } = &e {
                debug!(%body, "chat: provider error body");
            }
            ChatTurn::assistant(FALLBACK_TEXT)
        }
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
