//! Conversation history list.
//!
//! One store per application: created at start, populated from the
//! conversation listing, extended when a session creates a conversation,
//! and cleared on sign-out. Injected into sessions rather than global.

use std::cell::RefCell;
use std::rc::Rc;
use chat_types::{Result, conversation::ConversationSummary};
use crate::ports::ConversationPort;

#[derive(Clone, Default)]
pub struct HistoryStore {
    conversations: Rc<RefCell<Vec<ConversationSummary>>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list with the server's listing.
    /// On failure the list is emptied and the error returned.
    pub async fn load(&self, api: &dyn ConversationPort) -> Result<usize> {
        match api.list().await {
            Ok(list) => {
                let count = list.len();
                *self.conversations.borrow_mut() = list;
                log::debug!("History loaded: {} conversations", count);
                Ok(count)
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    /// Newest conversations go first
    pub fn insert_front(&self, summary: ConversationSummary) {
        let mut list = self.conversations.borrow_mut();
        list.retain(|c| c.id != summary.id);
        list.insert(0, summary);
    }

    pub fn list(&self) -> Vec<ConversationSummary> {
        self.conversations.borrow().clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.conversations.borrow().iter().any(|c| c.id == id)
    }

    pub fn clear(&self) {
        self.conversations.borrow_mut().clear();
    }
}
