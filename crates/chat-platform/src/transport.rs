//! Fetch-based chat transport.
//!
//! Both calls POST the same JSON payload; the streaming endpoint keeps the
//! response open and pushes `data: ` records through the body.
//! Uses browser `fetch()` via gloo-net for WASM compatibility.

use async_trait::async_trait;
use gloo_net::http::{Request, Response};

use chat_core::auth::AuthState;
use chat_core::ports::{ByteStream, TransportPort};
use chat_types::{
    ChatError, Result,
    config::ApiConfig,
    payload::{ChatPayload, ChatReply},
};
use crate::http::{authorized, failure_message};
use crate::stream::byte_stream;

pub struct HttpChatTransport {
    api: ApiConfig,
    auth: AuthState,
}

impl HttpChatTransport {
    pub fn new(api: ApiConfig, auth: AuthState) -> Self {
        Self { api, auth }
    }

    async fn post(&self, path: &str, accept: &str, payload: &ChatPayload) -> Result<Response> {
        let url = self.api.url(path);
        let builder = Request::post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", accept);

        let response = authorized(builder, &self.auth)
            .json(payload)
            .map_err(|e| ChatError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let message = failure_message(response).await;
            log::warn!("POST {} failed with {}: {}", url, status, message);
            return Err(ChatError::Transport(message));
        }
        Ok(response)
    }
}

#[async_trait(?Send)]
impl TransportPort for HttpChatTransport {
    async fn send(&self, payload: &ChatPayload) -> Result<ChatReply> {
        let response = self
            .post(&self.api.message_path, "application/json", payload)
            .await?;
        response
            .json::<ChatReply>()
            .await
            .map_err(|e| ChatError::Transport(format!("Unexpected reply: {}", e)))
    }

    async fn open_stream(&self, payload: &ChatPayload) -> Result<ByteStream> {
        let response = self
            .post(&self.api.stream_path, "text/event-stream", payload)
            .await?;
        let body = response
            .body()
            .ok_or_else(|| ChatError::Transport("Streaming response has no body".to_string()))?;
        log::debug!("Stream opened ({})", response.status());
        Ok(byte_stream(body))
    }
}
