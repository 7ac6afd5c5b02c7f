use serde::{Deserialize, Serialize};
use crate::message::{Message, MessageState};

/// Events emitted by a conversation session.
/// The presentation layer subscribes to these for reactive updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// The server assigned an id to a new conversation
    ConversationStarted { conversation_id: String },

    /// History was replaced, e.g. after opening an existing conversation
    HistoryLoaded { messages: Vec<Message> },

    /// A user message or assistant placeholder was appended
    MessageAppended { index: usize, message: Message },

    /// The attachment of the user message at `index` finished uploading
    AttachmentUploaded { index: usize, url: String },

    /// A token was applied; `content` is the full text after the append
    TokenApplied { index: usize, token: String, content: String },

    /// A buffered reply filled the assistant message at once
    ReplyFilled { index: usize, content: String },

    /// An assistant message changed state
    StateChanged { index: usize, state: MessageState },

    /// The caller must sign in before sending
    AuthRequired,

    /// A user-visible, transient notification
    Notification { level: NotificationLevel, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}
