//! Laponia — a small HTTP chatbot service backed by Groq and SQLite.
//!
//! The service forwards user messages to a hosted LLM completion endpoint
//! and persists every exchange, plus simple key/value "knowledge" facts, in
//! a local SQLite database. Two components carry all the logic:
//!
//! - [`store`] — serialized access to the conversation log and knowledge
//!   facts; failures become sentinels, never errors.
//! - [`chat`] — the orchestrator: recent history in, completion call out,
//!   exchange persisted, with knowledge commands (`/salvar`, `/recuperar`)
//!   dispatched straight to the store.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization, schema, and migrations
//! - [`store`] — Conversation log and knowledge fact storage
//! - [`command`] — Parser for the colon-delimited chat commands
//! - [`completion`] — Completion provider trait and the Groq client
//! - [`chat`] — The conversation orchestrator
//! - [`server`] — axum HTTP surface

pub mod chat;
pub mod command;
pub mod completion;
pub mod config;
pub mod db;
pub mod server;
pub mod store;
