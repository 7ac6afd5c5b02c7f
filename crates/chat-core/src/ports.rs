//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `chat-core` (pure Rust).
//! Implementations live in `chat-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::future::Future;
use std::pin::Pin;
use async_trait::async_trait;
use futures::Stream;
use chat_types::{
    Result,
    attachment::{AttachmentFile, UploadedAttachment},
    conversation::{Conversation, ConversationSummary},
    payload::{ChatPayload, ChatReply},
};

/// Raw response body of a streaming request.
/// Each item is one chunk as delivered by the network; an `Err` item is a
/// mid-stream read failure and ends the channel.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>>>>>;

// ─── Chat Transport Port ─────────────────────────────────────

#[async_trait(?Send)]
pub trait TransportPort {
    /// Buffered request/response call
    async fn send(&self, payload: &ChatPayload) -> Result<ChatReply>;

    /// Open a streaming call. Resolves once status and headers are in;
    /// the body is read lazily through the returned channel.
    async fn open_stream(&self, payload: &ChatPayload) -> Result<ByteStream>;
}

// ─── Upload Port ─────────────────────────────────────────────

#[async_trait(?Send)]
pub trait UploadPort {
    /// Upload a file and return its stable URL. Performs no validation.
    async fn upload(&self, file: &AttachmentFile) -> Result<UploadedAttachment>;
}

// ─── Conversation Port ───────────────────────────────────────

#[async_trait(?Send)]
pub trait ConversationPort {
    async fn list(&self) -> Result<Vec<ConversationSummary>>;

    /// Create an empty conversation on the server
    async fn create(&self) -> Result<ConversationSummary>;

    async fn fetch(&self, id: &str) -> Result<Conversation>;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Timer Port ──────────────────────────────────────────────

pub trait TimerPort {
    /// Future that resolves after `ms` milliseconds
    fn sleep(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()>>>;
}
