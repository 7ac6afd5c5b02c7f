//! WASM-target tests for chat-view.

use wasm_bindgen_test::*;

use chat_types::event::SessionEvent;
use chat_types::message::{Message, MessageState};
use chat_view::state::{ChatView, SUGGESTED_PROMPTS};

#[wasm_bindgen_test]
fn view_folds_streaming_turn() {
    let mut view = ChatView::new();
    view.process_events(vec![
        SessionEvent::MessageAppended { index: 0, message: Message::user("hi", None) },
        SessionEvent::MessageAppended { index: 1, message: Message::placeholder() },
        SessionEvent::StateChanged { index: 1, state: MessageState::Streaming },
        SessionEvent::TokenApplied {
            index: 1,
            token: "Hey".to_string(),
            content: "Hey".to_string(),
        },
        SessionEvent::StateChanged { index: 1, state: MessageState::Complete },
    ]);
    assert_eq!(view.messages[1].content, "Hey");
    assert!(!view.is_busy());
}

#[wasm_bindgen_test]
fn view_offers_suggestions() {
    let view = ChatView::new();
    assert_eq!(view.suggestions(), &SUGGESTED_PROMPTS);
}
