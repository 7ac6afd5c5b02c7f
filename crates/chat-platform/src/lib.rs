//! Browser adapters for the chat engine.
//!
//! Implements the `chat-core` ports with `fetch` (gloo-net), `localStorage`
//! and `setTimeout`, plus the credential flow around them.

pub mod http;
pub mod stream;
pub mod transport;
pub mod upload;
pub mod conversations;
pub mod auth;
pub mod storage;
pub mod timer;

#[cfg(test)]
mod tests;
