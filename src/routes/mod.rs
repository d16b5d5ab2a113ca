//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the widget page, the per-view websocket, the stateless proxy, and a
//! health probe under a single Axum router. The page is compiled into the
//! binary; it never sees the provider credentials.

pub mod chat;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The single-page chat widget.
const INDEX_HTML: &str = include_str!("../../static/index.html");

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat::send_message))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
