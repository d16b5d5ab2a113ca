//! WebSocket handler — one chat view per connection.
//!
//! DESIGN
//! ======
//! On upgrade, creates a client ID and an empty transcript, then enters a
//! `select!` loop:
//! - Incoming page frames → parse + dispatch by syscall prefix
//! - Settled completions → append assistant turn → forward to page
//!
//! The connection task is the only writer of its transcript. Completion
//! calls run in detached tasks and report back over an mpsc channel, so a
//! slow reply never blocks the view and several sends may be in flight.
//! Replies are appended in the order they settle.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → send `session:connected` with `client_id`
//! 2. `chat:send` → user turn item now, assistant turn item + done later
//! 3. Close → transcript dropped; late completions are discarded

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::frame::{Data, ErrorCode, Frame, Status};
use crate::services::chat;
use crate::state::AppState;
use crate::transcript::{ChatTurn, Transcript};

// =============================================================================
// TYPES
// =============================================================================

/// Result returned by handler functions. The dispatch layer turns it into
/// frames for the sender.
enum Outcome {
    /// Send an item; the request stays open.
    Item(Data),
    /// Send an empty done.
    Done,
    /// Send done carrying data.
    Reply(Data),
}

/// A completion that finished for an earlier `chat:send` request.
pub(crate) struct Settled {
    request: Frame,
    turn: ChatTurn,
}

#[derive(Debug, thiserror::Error)]
enum WsError {
    #[error("unknown syscall: {0}")]
    UnknownSyscall(String),
    #[error("expected a request frame, got {0:?}")]
    NotARequest(Status),
}

impl ErrorCode for WsError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownSyscall(_) => "E_UNKNOWN_SYSCALL",
            Self::NotARequest(_) => "E_NOT_A_REQUEST",
        }
    }
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let (settled_tx, mut settled_rx) = mpsc::channel::<Settled>(64);
    let mut transcript = Transcript::new();

    let welcome = Frame::request("session:connected", Data::new()).with_data("client_id", client_id.to_string());
    if send_frame(&mut socket, &welcome).await.is_err() {
        return;
    }

    info!(%client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let frames = process_inbound_text(&state, &mut transcript, client_id, &settled_tx, &text);
                        for frame in frames {
                            let _ = send_frame(&mut socket, &frame).await;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(settled) = settled_rx.recv() => {
                for frame in apply_settled(&mut transcript, settled) {
                    let _ = send_frame(&mut socket, &frame).await;
                }
            }
        }
    }

    info!(%client_id, turns = transcript.len(), "ws: client disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Parse and process one inbound text frame and return frames for the sender.
///
/// Kept free of socket I/O so tests can drive the chat flow directly.
fn process_inbound_text(
    state: &AppState,
    transcript: &mut Transcript,
    client_id: Uuid,
    settled_tx: &mpsc::Sender<Settled>,
    text: &str,
) -> Vec<Frame> {
    let mut req: Frame = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound frame");
            let err = Frame::request("gateway:error", Data::new()).with_data("message", format!("invalid json: {e}"));
            return vec![err];
        }
    };

    req.from = Some(client_id.to_string());
    info!(%client_id, id = %req.id, syscall = %req.syscall, "ws: recv frame");

    if req.status != Status::Request {
        return vec![req.error_from(&WsError::NotARequest(req.status))];
    }

    let result = match req.prefix() {
        "chat" => handle_chat(state, transcript, settled_tx, &req),
        "transcript" => handle_transcript(transcript, &req),
        _ => Err(req.error_from(&WsError::UnknownSyscall(req.syscall.clone()))),
    };

    match result {
        Ok(Outcome::Item(data)) => vec![req.item(data)],
        Ok(Outcome::Done) => vec![req.done()],
        Ok(Outcome::Reply(data)) => vec![req.done_with(data)],
        Err(err_frame) => vec![err_frame],
    }
}

/// Append a settled completion and return the frames that close its request.
fn apply_settled(transcript: &mut Transcript, settled: Settled) -> Vec<Frame> {
    let Settled { request, turn } = settled;
    let index = transcript.append(turn.clone());
    vec![request.item(turn.to_data(index)), request.done()]
}

// =============================================================================
// CHAT HANDLER
// =============================================================================

fn handle_chat(
    state: &AppState,
    transcript: &mut Transcript,
    settled_tx: &mpsc::Sender<Settled>,
    req: &Frame,
) -> Result<Outcome, Frame> {
    match req.op() {
        "send" => {
            let raw = req
                .data
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or("");

            let Some((index, turn)) = chat::accept(transcript, raw) else {
                return Ok(Outcome::Done);
            };

            spawn_completion(state, settled_tx.clone(), req.clone(), turn.text().to_string());
            Ok(Outcome::Item(turn.to_data(index)))
        }
        _ => Err(req.error_from(&WsError::UnknownSyscall(req.syscall.clone()))),
    }
}

/// Run the completion call off the connection task and report back.
fn spawn_completion(state: &AppState, settled_tx: mpsc::Sender<Settled>, request: Frame, text: String) {
    let llm = Arc::clone(&state.llm);
    tokio::spawn(async move {
        let turn = chat::complete(llm.as_ref(), &text).await;
        let id = request.id;
        if settled_tx.send(Settled { request, turn }).await.is_err() {
            debug!(%id, "ws: view closed before completion settled");
        }
    });
}

// =============================================================================
// TRANSCRIPT HANDLER
// =============================================================================

fn handle_transcript(transcript: &Transcript, req: &Frame) -> Result<Outcome, Frame> {
    match req.op() {
        "list" => {
            let turns: Vec<serde_json::Value> = transcript
                .turns()
                .iter()
                .enumerate()
                .map(|(i, turn)| serde_json::json!(turn.to_data(i)))
                .collect();
            let mut data = Data::new();
            data.insert("turns".into(), serde_json::json!(turns));
            Ok(Outcome::Reply(data))
        }
        _ => Err(req.error_from(&WsError::UnknownSyscall(req.syscall.clone()))),
    }
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), ()> {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize frame");
            return Err(());
        }
    };
    if frame.status == Status::Error {
        let message = frame
            .data
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("-");
        warn!(id = %frame.id, syscall = %frame.syscall, message, "ws: send frame status=Error");
    } else {
        info!(id = %frame.id, syscall = %frame.syscall, status = ?frame.status, "ws: send frame");
    }
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
