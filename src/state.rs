//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds only the LLM client. Transcripts are not shared state: each
//! websocket connection owns its own for the lifetime of the page view.

use std::sync::Arc;

use crate::llm::LlmChat;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmChat>,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmChat>) -> Self {
        Self { llm }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::llm::types::{ChatResponse, LlmError, Message, Role};

    /// One recorded call to [`MockLlm::chat`].
    #[derive(Debug, Clone)]
    pub struct MockCall {
        pub system: String,
        pub messages: Vec<Message>,
    }

    /// Scripted `LlmChat`. Pops queued results in order; once the queue is
    /// empty it echoes the last user message as `echo: <text>`.
    #[derive(Default)]
    pub struct MockLlm {
        responses: Mutex<VecDeque<Result<ChatResponse, LlmError>>>,
        calls: Mutex<Vec<MockCall>>,
        delays: HashMap<String, Duration>,
    }

    impl MockLlm {
        #[must_use]
        pub fn echo() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn replying(texts: &[&str]) -> Self {
            let responses = texts
                .iter()
                .map(|t| Ok(ChatResponse { content: (*t).to_string(), model: "mock".into() }))
                .collect();
            Self { responses: Mutex::new(responses), ..Self::default() }
        }

        #[must_use]
        pub fn failing(err: LlmError) -> Self {
            Self { responses: Mutex::new(VecDeque::from([Err(err)])), ..Self::default() }
        }

        /// Hold the reply to `text` for `delay` before answering.
        #[must_use]
        pub fn with_delay(mut self, text: &str, delay: Duration) -> Self {
            self.delays.insert(text.to_string(), delay);
            self
        }

        pub fn calls(&self) -> Vec<MockCall> {
            self.calls.lock().expect("mock mutex should lock").clone()
        }
    }

    #[async_trait::async_trait]
    impl LlmChat for MockLlm {
        async fn chat(&self, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
            self.calls
                .lock()
                .expect("mock mutex should lock")
                .push(MockCall { system: system.to_string(), messages: messages.to_vec() });

            let last_user = messages
                .iter()
                .rev()
                .find(|m| m.role == Role::User)
                .map(|m| m.content.clone())
                .unwrap_or_default();
            if let Some(delay) = self.delays.get(&last_user) {
                tokio::time::sleep(*delay).await;
            }

            let scripted = self
                .responses
                .lock()
                .expect("mock mutex should lock")
                .pop_front();
            scripted.unwrap_or_else(|| Ok(ChatResponse { content: format!("echo: {last_user}"), model: "mock".into() }))
        }
    }

    /// Create a test `AppState` around a mock LLM.
    #[must_use]
    pub fn test_app_state_with_llm(llm: Arc<MockLlm>) -> AppState {
        AppState::new(llm)
    }
}
