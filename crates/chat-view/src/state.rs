//! UI-level state that drives rendering.
//! This is a read-only projection of the session, updated by draining
//! the EventBus.

use std::collections::VecDeque;
use serde::Serialize;
use chat_types::event::{NotificationLevel, SessionEvent};
use chat_types::message::{Message, MessageState};

/// Starter prompts shown on an empty conversation
pub const SUGGESTED_PROMPTS: [&str; 3] = [
    "Generate a REST API for user management",
    "Create a GraphQL schema for a blog",
    "Build an API for e-commerce platform",
];

/// A transient notice (toast) waiting to be shown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NotificationLevel,
    pub message: String,
}

/// State visible to the page
#[derive(Debug, Clone, Serialize)]
pub struct ChatView {
    /// Conversation in display order
    pub messages: Vec<Message>,
    pub conversation_id: Option<String>,
    /// Oldest first
    pub notifications: VecDeque<Notice>,
    /// Set when a send was refused for lack of a credential
    pub show_auth_prompt: bool,
    /// Input field content
    pub input_text: String,
    pub status_text: String,
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            conversation_id: None,
            notifications: VecDeque::new(),
            show_auth_prompt: false,
            input_text: String::new(),
            status_text: "Ready".to_string(),
        }
    }

    /// Process events from the EventBus and update view state
    pub fn process_events(&mut self, events: Vec<SessionEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ConversationStarted { conversation_id } => {
                self.conversation_id = Some(conversation_id);
            }
            SessionEvent::HistoryLoaded { messages } => {
                self.messages = messages;
                self.status_text = "Ready".to_string();
            }
            SessionEvent::MessageAppended { index, message } => {
                if index != self.messages.len() {
                    log::warn!(
                        "View out of step: append at {} with {} messages",
                        index,
                        self.messages.len()
                    );
                }
                if message.is_active() {
                    self.status_text = status_for(message.state).to_string();
                }
                self.messages.push(message);
            }
            SessionEvent::AttachmentUploaded { index, url } => {
                if let Some(attachment) = self
                    .messages
                    .get_mut(index)
                    .and_then(|m| m.attachment.as_mut())
                {
                    attachment.url = Some(url);
                }
            }
            SessionEvent::TokenApplied { index, content, .. }
            | SessionEvent::ReplyFilled { index, content } => {
                if let Some(message) = self.messages.get_mut(index) {
                    message.content = content;
                }
            }
            SessionEvent::StateChanged { index, state } => {
                if let Some(message) = self.messages.get_mut(index) {
                    message.state = state;
                }
                self.status_text = status_for(state).to_string();
            }
            SessionEvent::AuthRequired => {
                self.show_auth_prompt = true;
            }
            SessionEvent::Notification { level, message } => {
                self.notifications.push_back(Notice { level, message });
            }
        }
    }

    /// A reply is pending or streaming
    pub fn is_busy(&self) -> bool {
        self.messages.iter().any(Message::is_active)
    }

    /// Suggestions are offered only before the first message
    pub fn suggestions(&self) -> &'static [&'static str] {
        if self.messages.is_empty() {
            &SUGGESTED_PROMPTS
        } else {
            &[]
        }
    }

    /// Copy a suggested prompt into the input field
    pub fn use_suggestion(&mut self, index: usize) -> bool {
        match self.suggestions().get(index) {
            Some(prompt) => {
                self.input_text = prompt.to_string();
                true
            }
            None => false,
        }
    }

    /// Hand the queued notices to the page
    pub fn take_notifications(&mut self) -> Vec<Notice> {
        self.notifications.drain(..).collect()
    }

    pub fn dismiss_auth_prompt(&mut self) {
        self.show_auth_prompt = false;
    }

    /// Forget the conversation, e.g. on "new chat" or sign-out
    pub fn clear(&mut self) {
        self.messages.clear();
        self.conversation_id = None;
        self.status_text = "Ready".to_string();
    }
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

fn status_for(state: MessageState) -> &'static str {
    match state {
        MessageState::Pending => "Thinking...",
        MessageState::Streaming => "Responding...",
        MessageState::Complete => "Ready",
        MessageState::Failed => "Failed",
        MessageState::Cancelled => "Cancelled",
    }
}
