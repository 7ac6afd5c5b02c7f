//! Conversation listing, creation and retrieval over HTTP.
//!
//! The server stores a conversation as a list of query/response pairs;
//! they are flattened here into alternating user/assistant messages.

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::Deserialize;
use serde_json::Value;

use chat_core::auth::AuthState;
use chat_core::ports::ConversationPort;
use chat_types::{
    ChatError, Result,
    config::ApiConfig,
    conversation::{Conversation, ConversationSummary},
    message::Message,
};
use crate::http::{authorized, failure_message};

const UNTITLED: &str = "New chat";

pub struct HttpConversationApi {
    api: ApiConfig,
    auth: AuthState,
}

impl HttpConversationApi {
    pub fn new(api: ApiConfig, auth: AuthState) -> Self {
        Self { api, auth }
    }

    async fn checked(&self, response: std::result::Result<Response, gloo_net::Error>) -> Result<Value> {
        let response = response.map_err(|e| ChatError::Transport(e.to_string()))?;
        if response.status() == 401 {
            return Err(ChatError::AuthRequired);
        }
        if !response.ok() {
            return Err(ChatError::Transport(failure_message(response).await));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))
    }
}

#[async_trait(?Send)]
impl ConversationPort for HttpConversationApi {
    async fn list(&self) -> Result<Vec<ConversationSummary>> {
        let url = self.api.url(&self.api.conversations_path);
        let body = self
            .checked(authorized(Request::get(&url), &self.auth).send().await)
            .await?;
        Ok(summaries_from_listing(body))
    }

    async fn create(&self) -> Result<ConversationSummary> {
        let url = self.api.url(&self.api.conversations_path);
        let request = authorized(Request::post(&url), &self.auth)
            .json(&serde_json::json!({}))
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        let body = self.checked(request.send().await).await?;
        let record: ConversationRecord = serde_json::from_value(body)?;
        log::info!("Conversation created: {}", record.id.as_string());
        Ok(record.summary())
    }

    async fn fetch(&self, id: &str) -> Result<Conversation> {
        let url = format!("{}/{}", self.api.url(&self.api.conversations_path), id);
        let body = self
            .checked(authorized(Request::get(&url), &self.auth).send().await)
            .await?;
        let record: ConversationRecord = serde_json::from_value(body)?;
        Ok(record.into_conversation())
    }
}

// ─── Wire DTOs ───────────────────────────────────────────────

/// Ids come back as either JSON strings or numbers
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl RecordId {
    pub fn as_string(&self) -> String {
        match self {
            RecordId::Text(s) => s.clone(),
            RecordId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRecord {
    pub query: String,
    #[serde(default)]
    pub response: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationRecord {
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub queries: Vec<QueryRecord>,
}

impl ConversationRecord {
    pub fn summary(&self) -> ConversationSummary {
        let title = self
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.queries.first().map(|q| q.query.clone()))
            .unwrap_or_else(|| UNTITLED.to_string());
        ConversationSummary {
            id: self.id.as_string(),
            title,
            created_at: self.created_at.clone().unwrap_or_default(),
        }
    }

    pub fn into_conversation(self) -> Conversation {
        let mut messages = Vec::with_capacity(self.queries.len() * 2);
        for q in self.queries {
            messages.push(Message::user(q.query, None));
            if let Some(response) = q.response.filter(|r| !r.is_empty()) {
                messages.push(Message::assistant(response));
            }
        }
        Conversation::restore(
            self.id.as_string(),
            messages,
            self.created_at.unwrap_or_default(),
        )
    }
}

/// A listing that is not an array is treated as empty; entries that do not
/// parse are skipped.
pub fn summaries_from_listing(body: Value) -> Vec<ConversationSummary> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<ConversationRecord>(item).ok())
            .map(|record| record.summary())
            .collect(),
        _ => {
            log::warn!("Conversation listing is not an array");
            Vec::new()
        }
    }
}
