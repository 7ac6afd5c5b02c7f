use serde::{Deserialize, Serialize};
use crate::attachment::AttachmentFile;
use crate::{ChatError, Result};

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub message_path: String,
    pub stream_path: String,
    pub conversations_path: String,
    pub login_path: String,
    pub register_path: String,
    pub current_user_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            message_path: "/chat/message".to_string(),
            stream_path: "/chat/stream".to_string(),
            conversations_path: "/conversations".to_string(),
            login_path: "/login".to_string(),
            register_path: "/user".to_string(),
            current_user_path: "/users/me".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Object-store upload endpoint (multipart, field `file`)
    pub endpoint: String,
    /// Unsigned upload preset, sent as `upload_preset` when set
    pub upload_preset: Option<String>,
    pub max_bytes: usize,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/chat/upload".to_string(),
            upload_preset: None,
            max_bytes: 10 * 1024 * 1024,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl UploadConfig {
    /// Reject files the backend will not accept, before any network call.
    pub fn check(&self, file: &AttachmentFile) -> Result<()> {
        if !self.allowed_mime_types.iter().any(|m| m == &file.mime_type) {
            return Err(ChatError::Validation(
                "Invalid file type. Only PDF, TXT, DOC, JPEG, and PNG files are allowed."
                    .to_string(),
            ));
        }
        if file.size() > self.max_bytes {
            return Err(ChatError::Validation(format!(
                "File is too large ({} bytes, limit {} bytes).",
                file.size(),
                self.max_bytes
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: SendMode,
    /// Fail a stream when no chunk arrives for this long. `None` disables it.
    pub idle_timeout_ms: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: SendMode::Streaming,
            idle_timeout_ms: Some(30_000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendMode {
    Streaming,
    Buffered,
}

const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "text/plain",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/png",
];
