//! Stateless chat proxy — one message in, one assistant turn out.
//!
//! For callers that keep their own transcript. Same pipeline as the
//! websocket view: blank text is refused before any outbound call, and every
//! completion failure comes back as the fallback turn with status 200.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::services::chat;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    #[serde(default)]
    pub text: String,
}

pub async fn send_message(State(state): State<AppState>, Json(body): Json<SendMessageBody>) -> Response {
    if body.text.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "text required").into_response();
    }
    let turn = chat::complete(state.llm.as_ref(), &body.text).await;
    Json(turn).into_response()
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
