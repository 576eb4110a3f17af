use crate::conversation::{Conversation, Message};
use crate::error::Result;
use crate::prompts::{WELCOME_MESSAGE, WELCOME_MESSAGE_ID};

/// Suggested prompts are offered only while the conversation is shorter than this
pub const SUGGESTION_CUTOFF: usize = 3;

/// Mutable state of one chat session, owned by a single controller
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    conversation: Conversation,
    input: String,
    busy: bool,
}

impl ChatState {
    /// Empty state, no welcome message
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a fresh session, opened by the assistant's greeting
    pub fn with_welcome() -> Self {
        let mut conversation = Conversation::new();
        let welcome = Message::model(WELCOME_MESSAGE).with_id(WELCOME_MESSAGE_ID);
        // the fixed id is non-empty, append cannot fail
        let _ = conversation.append(welcome);
        Self {
            conversation,
            ..Self::default()
        }
    }

    pub fn append(&mut self, message: Message) -> Result<()> {
        self.conversation.append(message)
    }

    pub fn update_text(&mut self, id: &str, text: impl Into<String>) {
        self.conversation.update_text(id, text);
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn suggestions_visible(&self) -> bool {
        self.conversation.len() < SUGGESTION_CUTOFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;

    #[test]
    fn welcome_state_starts_with_greeting() {
        let state = ChatState::with_welcome();
        let first = state.conversation().last().unwrap();
        assert_eq!(first.id, WELCOME_MESSAGE_ID);
        assert_eq!(first.role, Role::Model);
        assert!(!state.is_busy());
        assert!(state.input().is_empty());
    }

    #[test]
    fn suggestions_hide_at_three_messages() {
        let mut state = ChatState::with_welcome();
        assert!(state.suggestions_visible());
        state.append(Message::user("hola")).unwrap();
        assert!(state.suggestions_visible());
        state.append(Message::model("")).unwrap();
        assert!(!state.suggestions_visible());
    }

    #[test]
    fn input_transitions() {
        let mut state = ChatState::new();
        state.set_input("borrador");
        assert_eq!(state.input(), "borrador");
        state.clear_input();
        assert_eq!(state.input(), "");
    }

    #[test]
    fn busy_transitions() {
        let mut state = ChatState::new();
        state.set_busy(true);
        assert!(state.is_busy());
        state.set_busy(false);
        assert!(!state.is_busy());
    }
}
