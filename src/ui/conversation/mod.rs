//! Conversation UI components for the chat screen

pub mod commands;
pub mod composer;
pub mod history;
pub mod manager;
pub mod streaming;

pub use commands::{get_help_text, ParsedCommand, SlashCommand};
pub use composer::{ComposerResult, ConversationComposer};
pub use history::ConversationHistory;
pub use manager::{ConversationAction, ConversationManager};
pub use streaming::TypingIndicator;
