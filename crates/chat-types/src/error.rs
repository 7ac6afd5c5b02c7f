use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Stream decode error: {0}")]
    Decode(String),

    #[error("A response is already in progress for this conversation")]
    SessionBusy,

    #[error("No data received for {0}ms")]
    Timeout(u64),

    #[error("Cancelled")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),
}

impl ChatError {
    /// Message shown to the user when this error settles a send.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Upload(_) => "Failed to process file. Please try again.".to_string(),
            ChatError::Cancelled => "Response cancelled.".to_string(),
            ChatError::Validation(reason) => reason.clone(),
            ChatError::AuthRequired => "Please sign in to continue.".to_string(),
            ChatError::SessionBusy => {
                "Please wait for the current response to finish.".to_string()
            }
            _ => "Failed to send message. Please try again.".to_string(),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Serialization(e.to_string())
    }
}
