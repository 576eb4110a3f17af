//! Chat assistant for facilitators of the "Cuentas Sanas sin esfuerzo" workshop.
//!
//! A conversation store and streaming controller sit behind a terminal UI; the
//! hosted completion service is reached through [`llm::CompletionClient`].

pub mod commands;
pub mod config;
pub mod content;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod logging;
pub mod prompts;
pub mod session;
pub mod streaming;
pub mod ui;
