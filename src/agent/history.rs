//! Conversation message history.

use crate::types::{ChatMessage, Role};

/// Ordered message history of one conversation.
///
/// Index 0 is always the system message the history was seeded with; nothing
/// in this type can remove or replace it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    messages: Vec<ChatMessage>,
}

impl History {
    /// Seed a history with the system instructions.
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(instructions)],
        }
    }

    pub(crate) fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::user(text));
    }

    pub(crate) fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(text));
    }

    /// Borrowed view of all messages.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Owned copy of all messages.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    pub fn system_message(&self) -> &ChatMessage {
        &self.messages[0]
    }

    pub fn last(&self) -> &ChatMessage {
        // Never empty: the system message is always present.
        &self.messages[self.messages.len() - 1]
    }

    /// Get the last N messages.
    pub fn last_n(&self, n: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Whether the last turn is a user message with no assistant reply.
    pub fn has_unanswered_user_message(&self) -> bool {
        self.last().role == Role::User
    }

    /// Drop everything but the system message.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    /// Number of messages, including the system message.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}
