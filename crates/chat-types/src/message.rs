use serde::{Deserialize, Serialize};
use crate::attachment::Attachment;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Completion state of a message.
///
/// Assistant messages move `Pending → Streaming → {Complete | Failed | Cancelled}`.
/// User messages are created `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageState {
    Pending,
    Streaming,
    Complete,
    Failed,
    Cancelled,
}

impl MessageState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MessageState::Complete | MessageState::Failed | MessageState::Cancelled
        )
    }

    /// Allowed edges of the assistant state machine.
    /// `Pending → Complete` is the buffered (non-streaming) path.
    pub fn can_transition_to(self, next: MessageState) -> bool {
        use MessageState::*;
        matches!(
            (self, next),
            (Pending, Streaming)
                | (Pending, Complete)
                | (Pending, Failed)
                | (Pending, Cancelled)
                | (Streaming, Complete)
                | (Streaming, Failed)
                | (Streaming, Cancelled)
        )
    }
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub attachment: Option<Attachment>,
    pub state: MessageState,
    pub created_at: String,
}

impl Message {
    pub fn user(text: impl Into<String>, attachment: Option<Attachment>) -> Self {
        Self::build(Role::User, text.into(), attachment, MessageState::Complete)
    }

    /// Empty assistant message awaiting its first token
    pub fn placeholder() -> Self {
        Self::build(Role::Assistant, String::new(), None, MessageState::Pending)
    }

    /// Finished assistant message, e.g. restored from history
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::build(Role::Assistant, text.into(), None, MessageState::Complete)
    }

    fn build(
        role: Role,
        content: String,
        attachment: Option<Attachment>,
        state: MessageState,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            attachment,
            state,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.role == Role::Assistant && !self.state.is_terminal()
    }
}
