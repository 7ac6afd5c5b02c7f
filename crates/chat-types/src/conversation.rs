//! Conversation history and the mutation rules that keep it consistent.
//!
//! Messages are only ever appended. User messages never change after
//! insertion; an assistant message grows by appending tokens while it is
//! `Streaming` and settles exactly once.

use serde::{Deserialize, Serialize};
use crate::message::{Message, MessageState, Role};
use crate::{ChatError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Server-assigned; `None` until the first send creates it
    pub id: Option<String>,
    messages: Vec<Message>,
    pub created_at: String,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: None,
            messages: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Rebuild a conversation fetched from the server
    pub fn restore(id: String, messages: Vec<Message>, created_at: String) -> Self {
        Self {
            id: Some(id),
            messages,
            created_at,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Index of the assistant message that is still pending or streaming
    pub fn active_index(&self) -> Option<usize> {
        self.messages.iter().rposition(Message::is_active)
    }

    /// Append a message and return its index.
    /// Rejects a second in-flight assistant message.
    pub fn push(&mut self, message: Message) -> Result<usize> {
        if message.is_active() && self.active_index().is_some() {
            return Err(ChatError::SessionBusy);
        }
        self.messages.push(message);
        Ok(self.messages.len() - 1)
    }

    /// Append a token to the streaming assistant message at `index`.
    /// Returns the content after the append.
    pub fn append_token(&mut self, index: usize, token: &str) -> Result<&str> {
        let message = self.assistant_mut(index)?;
        if message.state != MessageState::Streaming {
            return Err(ChatError::Validation(format!(
                "message {} is {:?}, not streaming",
                index, message.state
            )));
        }
        message.content.push_str(token);
        Ok(&message.content)
    }

    /// Replace the whole content of a pending assistant message in one step
    /// (buffered replies). The message must still be empty.
    pub fn fill(&mut self, index: usize, text: &str) -> Result<()> {
        let message = self.assistant_mut(index)?;
        if message.state != MessageState::Pending || !message.content.is_empty() {
            return Err(ChatError::Validation(format!(
                "message {} cannot be filled in state {:?}",
                index, message.state
            )));
        }
        message.content.push_str(text);
        Ok(())
    }

    pub fn transition(&mut self, index: usize, next: MessageState) -> Result<()> {
        let message = self.assistant_mut(index)?;
        if !message.state.can_transition_to(next) {
            return Err(ChatError::Validation(format!(
                "illegal transition {:?} -> {:?} for message {}",
                message.state, next, index
            )));
        }
        message.state = next;
        Ok(())
    }

    fn assistant_mut(&mut self, index: usize) -> Result<&mut Message> {
        let message = self
            .messages
            .get_mut(index)
            .ok_or_else(|| ChatError::Validation(format!("no message at {}", index)))?;
        if message.role != Role::Assistant {
            return Err(ChatError::Validation(format!(
                "message {} is a user message and cannot change",
                index
            )));
        }
        Ok(message)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of a conversation for the history list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub created_at: String,
}
