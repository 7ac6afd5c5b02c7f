use serde::{Deserialize, Serialize};
use crate::attachment::{AttachmentKind, UploadedAttachment};

/// Body of both the buffered and the streaming chat request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    pub message: String,
    pub follow_up: Option<String>,
    pub image_url: Option<String>,
    pub file_url: Option<String>,
    pub conversation_id: Option<String>,
}

impl ChatPayload {
    pub fn new(message: impl Into<String>, conversation_id: Option<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id,
            ..Self::default()
        }
    }

    /// Route the uploaded URL into `imageUrl` or `fileUrl` by kind
    pub fn with_attachment(mut self, uploaded: &UploadedAttachment) -> Self {
        match uploaded.kind {
            AttachmentKind::Image => self.image_url = Some(uploaded.url.clone()),
            AttachmentKind::File => self.file_url = Some(uploaded.url.clone()),
        }
        self
    }
}

/// Reply of the buffered chat endpoint.
/// Older deployments answer with `reply` instead of `response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(alias = "reply")]
    pub response: String,
}
