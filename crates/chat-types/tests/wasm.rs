//! WASM-target tests for chat-types.
//!
//! Mirrors the native unit tests but runs under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use chat_types::attachment::*;
use chat_types::config::*;
use chat_types::conversation::*;
use chat_types::message::*;
use chat_types::payload::*;
use chat_types::ChatError;

// ─── Message Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn message_ids_and_timestamps_work_in_wasm() {
    let msg = Message::user("hello", None);
    assert!(!msg.id.is_empty());
    assert!(msg.created_at.contains('T'));
}

#[wasm_bindgen_test]
fn placeholder_is_pending() {
    let msg = Message::placeholder();
    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.state, MessageState::Pending);
}

// ─── Conversation Tests ──────────────────────────────────

#[wasm_bindgen_test]
fn conversation_streams_tokens() {
    let mut conv = Conversation::new();
    conv.push(Message::user("Build an API", None)).unwrap();
    let idx = conv.push(Message::placeholder()).unwrap();
    conv.transition(idx, MessageState::Streaming).unwrap();
    conv.append_token(idx, "Here").unwrap();
    conv.append_token(idx, " is").unwrap();
    conv.transition(idx, MessageState::Complete).unwrap();
    assert_eq!(conv.messages()[idx].content, "Here is");
}

#[wasm_bindgen_test]
fn conversation_single_flight() {
    let mut conv = Conversation::new();
    conv.push(Message::placeholder()).unwrap();
    assert_eq!(conv.push(Message::placeholder()).unwrap_err(), ChatError::SessionBusy);
}

// ─── Payload / Config Tests ──────────────────────────────

#[wasm_bindgen_test]
fn payload_routes_image() {
    let uploaded = UploadedAttachment {
        url: "https://cdn/x.png".to_string(),
        kind: AttachmentKind::Image,
    };
    let payload = ChatPayload::new("look", None).with_attachment(&uploaded);
    let json = serde_json::to_string(&payload).unwrap();
    assert!(json.contains(r#""imageUrl":"https://cdn/x.png""#));
    assert!(json.contains(r#""fileUrl":null"#));
}

#[wasm_bindgen_test]
fn upload_check_rejects_unknown_mime() {
    let upload = UploadConfig::default();
    let file = AttachmentFile::new("x.gif", "image/gif", vec![1]);
    assert!(upload.check(&file).is_err());
}
