#[cfg(test)]
mod tests {
    use crate::state::*;
    use chat_types::attachment::{Attachment, AttachmentFile};
    use chat_types::event::{NotificationLevel, SessionEvent};
    use chat_types::message::{Message, MessageState};

    fn appended(index: usize, message: Message) -> SessionEvent {
        SessionEvent::MessageAppended { index, message }
    }

    fn token(index: usize, token: &str, content: &str) -> SessionEvent {
        SessionEvent::TokenApplied {
            index,
            token: token.to_string(),
            content: content.to_string(),
        }
    }

    // ─── ChatView Tests ──────────────────────────────────────

    #[test]
    fn test_view_initial() {
        let view = ChatView::new();
        assert!(view.messages.is_empty());
        assert!(view.conversation_id.is_none());
        assert!(view.notifications.is_empty());
        assert!(!view.show_auth_prompt);
        assert!(view.input_text.is_empty());
        assert_eq!(view.status_text, "Ready");
        assert!(!view.is_busy());
    }

    #[test]
    fn test_view_streaming_turn() {
        let mut view = ChatView::new();
        view.process_events(vec![
            SessionEvent::ConversationStarted { conversation_id: "c1".to_string() },
            appended(0, Message::user("Build an API", None)),
            appended(1, Message::placeholder()),
        ]);
        assert_eq!(view.conversation_id.as_deref(), Some("c1"));
        assert_eq!(view.messages.len(), 2);
        assert!(view.is_busy());
        assert_eq!(view.status_text, "Thinking...");

        view.process_events(vec![
            SessionEvent::StateChanged { index: 1, state: MessageState::Streaming },
            token(1, "Here", "Here"),
            token(1, " is", "Here is"),
        ]);
        assert_eq!(view.messages[1].content, "Here is");
        assert_eq!(view.status_text, "Responding...");

        view.apply(SessionEvent::StateChanged { index: 1, state: MessageState::Complete });
        assert_eq!(view.messages[1].state, MessageState::Complete);
        assert!(!view.is_busy());
        assert_eq!(view.status_text, "Ready");
    }

    #[test]
    fn test_view_buffered_reply() {
        let mut view = ChatView::new();
        view.process_events(vec![
            appended(0, Message::user("hi", None)),
            appended(1, Message::placeholder()),
            SessionEvent::ReplyFilled { index: 1, content: "Hello".to_string() },
            SessionEvent::StateChanged { index: 1, state: MessageState::Complete },
        ]);
        assert_eq!(view.messages[1].content, "Hello");
        assert!(!view.is_busy());
    }

    #[test]
    fn test_view_failure_keeps_partial_and_queues_notice() {
        let mut view = ChatView::new();
        view.process_events(vec![
            appended(0, Message::user("hi", None)),
            appended(1, Message::placeholder()),
            SessionEvent::StateChanged { index: 1, state: MessageState::Streaming },
            token(1, "Par", "Par"),
            SessionEvent::StateChanged { index: 1, state: MessageState::Failed },
            SessionEvent::Notification {
                level: NotificationLevel::Error,
                message: "Failed to send message. Please try again.".to_string(),
            },
        ]);
        assert_eq!(view.messages[1].content, "Par");
        assert_eq!(view.messages[1].state, MessageState::Failed);
        assert_eq!(view.status_text, "Failed");

        let notices = view.take_notifications();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NotificationLevel::Error);
        assert!(view.notifications.is_empty());
    }

    #[test]
    fn test_view_attachment_uploaded() {
        let file = AttachmentFile::new("design.pdf", "application/pdf", vec![1, 2, 3]);
        let mut view = ChatView::new();
        view.process_events(vec![
            appended(0, Message::user("Uploaded file: design.pdf", Some(Attachment::local(&file)))),
            SessionEvent::AttachmentUploaded { index: 0, url: "https://cdn/design.pdf".to_string() },
        ]);
        let attachment = view.messages[0].attachment.as_ref().unwrap();
        assert_eq!(attachment.url.as_deref(), Some("https://cdn/design.pdf"));
    }

    #[test]
    fn test_view_ignores_unknown_index() {
        let mut view = ChatView::new();
        view.process_events(vec![
            token(4, "x", "x"),
            SessionEvent::StateChanged { index: 9, state: MessageState::Failed },
            SessionEvent::AttachmentUploaded { index: 2, url: "u".to_string() },
        ]);
        assert!(view.messages.is_empty());
    }

    #[test]
    fn test_view_history_loaded_replaces() {
        let mut view = ChatView::new();
        view.apply(appended(0, Message::user("old", None)));
        view.apply(SessionEvent::HistoryLoaded {
            messages: vec![Message::user("q", None), Message::assistant("a")],
        });
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[1].content, "a");
    }

    #[test]
    fn test_view_auth_prompt() {
        let mut view = ChatView::new();
        view.apply(SessionEvent::AuthRequired);
        assert!(view.show_auth_prompt);
        view.dismiss_auth_prompt();
        assert!(!view.show_auth_prompt);
    }

    #[test]
    fn test_view_suggestions_only_when_empty() {
        let mut view = ChatView::new();
        assert_eq!(view.suggestions().len(), 3);
        assert!(view.use_suggestion(1));
        assert_eq!(view.input_text, "Create a GraphQL schema for a blog");
        assert!(!view.use_suggestion(3));

        view.apply(appended(0, Message::user("hi", None)));
        assert!(view.suggestions().is_empty());
        assert!(!view.use_suggestion(0));
    }

    #[test]
    fn test_view_clear() {
        let mut view = ChatView::new();
        view.process_events(vec![
            SessionEvent::ConversationStarted { conversation_id: "c1".to_string() },
            appended(0, Message::user("hi", None)),
        ]);
        view.clear();
        assert!(view.messages.is_empty());
        assert!(view.conversation_id.is_none());
        assert_eq!(view.suggestions().len(), 3);
    }

    #[test]
    fn test_view_serializes() {
        let mut view = ChatView::new();
        view.apply(SessionEvent::Notification {
            level: NotificationLevel::Warning,
            message: "Invalid file type.".to_string(),
        });
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status_text"], "Ready");
        assert_eq!(json["notifications"][0]["level"], "warning");
        assert_eq!(json["show_auth_prompt"], false);
    }
}
