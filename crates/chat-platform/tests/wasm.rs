//! WASM-target tests for chat-platform (Node.js runtime).
//!
//! Covers the storage fallback and the wire DTOs under
//! wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! The fetch adapters need a server and are exercised through chat-core's
//! session tests with mocked ports instead.

use wasm_bindgen_test::*;

use chat_core::ports::{StoragePort, TimerPort};
use chat_platform::conversations::ConversationRecord;
use chat_platform::storage::MemoryStorage;
use chat_platform::timer::GlooTimer;

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_storage_set_and_get() {
    let storage = MemoryStorage::new();
    storage.set("chat:config", "{}").await.unwrap();
    assert_eq!(storage.get("chat:config").await.unwrap().as_deref(), Some("{}"));
}

#[wasm_bindgen_test]
async fn memory_storage_delete_nonexistent() {
    let storage = MemoryStorage::new();
    storage.delete("nonexistent").await.unwrap();
}

// ─── Timer Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
async fn gloo_timer_resolves() {
    GlooTimer.sleep(1).await;
}

// ─── DTO Tests ───────────────────────────────────────────

#[wasm_bindgen_test]
fn conversation_record_flattens() {
    let record: ConversationRecord = serde_json::from_str(
        r#"{"id":"c1","queries":[{"query":"hi","response":"hello"}]}"#,
    )
    .unwrap();
    let conv = record.into_conversation();
    assert_eq!(conv.len(), 2);
    assert_eq!(conv.messages()[1].content, "hello");
}
