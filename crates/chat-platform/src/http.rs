//! Helpers shared by the fetch-based adapters.

use gloo_net::http::{RequestBuilder, Response};
use serde_json::Value;
use wasm_bindgen::JsValue;
use chat_core::auth::AuthState;

/// Attach the bearer credential when signed in
pub(crate) fn authorized(builder: RequestBuilder, auth: &AuthState) -> RequestBuilder {
    match auth.bearer() {
        Some(bearer) => builder.header("Authorization", &bearer),
        None => builder,
    }
}

/// Human-readable failure of a non-2xx response: the server's own message
/// when the body carries one, otherwise the status line.
pub(crate) async fn failure_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    server_message(&body).unwrap_or_else(|| format!("HTTP {}", status))
}

/// Pull `message`, `detail` or `error` out of a JSON error body.
pub fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "detail", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(String::from)
}

pub(crate) fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}
