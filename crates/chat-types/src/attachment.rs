use serde::{Deserialize, Serialize};

/// How an uploaded file is referenced in the chat payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    File,
}

impl AttachmentKind {
    /// `image/*` is an image, everything else is a generic file.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::File
        }
    }
}

/// A file picked or dropped by the user, before upload
#[derive(Debug, Clone)]
pub struct AttachmentFile {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl AttachmentFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::from_mime(&self.mime_type)
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAttachment {
    pub url: String,
    pub kind: AttachmentKind,
}

/// Attachment reference carried by a message.
///
/// A user message is appended before its file finishes uploading, so `url`
/// is `None` on freshly sent messages and set on ones restored from history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub url: Option<String>,
    pub kind: AttachmentKind,
    pub original_name: String,
}

impl Attachment {
    pub fn local(file: &AttachmentFile) -> Self {
        Self {
            url: None,
            kind: file.kind(),
            original_name: file.name.clone(),
        }
    }
}
