//! chatproxy — a single-page chat widget backed by a hosted completion API.
//!
//! The server renders nothing itself: it serves the widget page, keeps one
//! transcript per websocket view, and forwards each user message to the
//! completion service with the credentials it alone holds.

pub mod frame;
pub mod llm;
pub mod routes;
pub mod services;
pub mod state;
pub mod transcript;
