//! Conversation store: an ordered, append-only list of chat messages

use crate::error::{ChatError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Role name as the completion service expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    /// Replace the generated id, e.g. for the fixed welcome message
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Role/text pair sent to the completion service as prior context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: Role,
    pub text: String,
}

impl From<&Message> for HistoryTurn {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            text: message.text.clone(),
        }
    }
}

/// Ordered message list; messages are never removed
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message at the end. The id must be non-empty.
    pub fn append(&mut self, message: Message) -> Result<()> {
        if message.id.trim().is_empty() {
            return Err(ChatError::InvalidMessage("message id must not be empty".to_string()).into());
        }
        self.messages.push(message);
        Ok(())
    }

    /// Overwrite the text of the message with `id`. Unknown ids are ignored.
    pub fn update_text(&mut self, id: &str, text: impl Into<String>) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.text = text.into();
        }
    }

    /// The last `n` messages, oldest first
    pub fn recent_history(&self, n: usize) -> Vec<HistoryTurn> {
        let start = self.messages.len().saturating_sub(n);
        self.messages[start..].iter().map(HistoryTurn::from).collect()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(count: usize) -> Conversation {
        let mut conversation = Conversation::new();
        for i in 0..count {
            let message = if i % 2 == 0 {
                Message::user(format!("pregunta {i}"))
            } else {
                Message::model(format!("respuesta {i}"))
            };
            conversation.append(message).unwrap();
        }
        conversation
    }

    #[test]
    fn append_keeps_insertion_order() {
        let conversation = sample(3);
        let texts: Vec<_> = conversation.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["pregunta 0", "respuesta 1", "pregunta 2"]);
    }

    #[test]
    fn append_rejects_empty_id() {
        let mut conversation = Conversation::new();
        let result = conversation.append(Message::user("hola").with_id("  "));
        assert!(result.is_err());
        assert!(conversation.is_empty());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = Message::user("a");
        let b = Message::user("a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn update_text_replaces_matching_message() {
        let mut conversation = sample(2);
        let id = conversation.messages()[1].id.clone();
        conversation.update_text(&id, "nuevo texto");
        assert_eq!(conversation.messages()[1].text, "nuevo texto");
        assert_eq!(conversation.messages()[0].text, "pregunta 0");
    }

    #[test]
    fn update_text_unknown_id_is_noop() {
        let mut conversation = sample(2);
        let before = conversation.messages().to_vec();
        conversation.update_text("missing", "x");
        assert_eq!(conversation.messages(), before.as_slice());
    }

    #[test]
    fn recent_history_is_bounded_and_ordered() {
        let conversation = sample(15);
        let history = conversation.recent_history(10);
        assert_eq!(history.len(), 10);
        assert_eq!(history.first().unwrap().text, "respuesta 5");
        assert_eq!(history.last().unwrap().text, "pregunta 14");

        for n in 0..20 {
            assert!(conversation.recent_history(n).len() <= n);
        }
    }

    #[test]
    fn recent_history_shorter_than_window_returns_everything() {
        let conversation = sample(3);
        let history = conversation.recent_history(10);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Model);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
        assert_eq!(Role::User.to_string(), "user");
    }
}
