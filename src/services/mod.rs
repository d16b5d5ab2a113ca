//! Services — business logic between the routes and the LLM client.

pub mod chat;
