#[cfg(test)]
mod tests {
    use crate::auth::*;
    use crate::conversations::*;
    use crate::http::server_message;
    use crate::storage::MemoryStorage;
    use crate::upload::UploadResponse;
    use chat_core::ports::StoragePort;
    use chat_types::message::{MessageState, Role};
    use futures::executor::block_on;
    use serde_json::json;

    // ─── Error Body Tests ────────────────────────────────────

    #[test]
    fn server_message_prefers_message_key() {
        let body = r#"{"message":"Quota exceeded","detail":"ignored"}"#;
        assert_eq!(server_message(body).as_deref(), Some("Quota exceeded"));
    }

    #[test]
    fn server_message_reads_detail() {
        let body = r#"{"detail":"Incorrect username or password"}"#;
        assert_eq!(
            server_message(body).as_deref(),
            Some("Incorrect username or password")
        );
    }

    #[test]
    fn server_message_ignores_non_json() {
        assert!(server_message("<html>502</html>").is_none());
        assert!(server_message("").is_none());
    }

    #[test]
    fn server_message_ignores_non_string_values() {
        assert!(server_message(r#"{"detail":[{"loc":"body"}]}"#).is_none());
    }

    // ─── Upload Response Tests ───────────────────────────────

    #[test]
    fn upload_response_prefers_secure_url() {
        let body: UploadResponse = serde_json::from_value(json!({
            "url": "http://cdn/a.png",
            "secure_url": "https://cdn/a.png"
        }))
        .unwrap();
        assert_eq!(body.into_url().as_deref(), Some("https://cdn/a.png"));
    }

    #[test]
    fn upload_response_falls_back_to_file_id() {
        let body: UploadResponse = serde_json::from_value(json!({"fileId": "f-42"})).unwrap();
        assert_eq!(body.into_url().as_deref(), Some("f-42"));
    }

    #[test]
    fn upload_response_without_url() {
        let body: UploadResponse = serde_json::from_value(json!({"ok": true})).unwrap();
        assert!(body.into_url().is_none());
    }

    // ─── Conversation DTO Tests ──────────────────────────────

    #[test]
    fn record_flattens_queries() {
        let record: ConversationRecord = serde_json::from_value(json!({
            "id": 7,
            "created_at": "2024-01-01T00:00:00Z",
            "queries": [
                {"query": "Build an API", "response": "Here is"},
                {"query": "And tests?", "response": null}
            ]
        }))
        .unwrap();
        let conv = record.into_conversation();
        assert_eq!(conv.id.as_deref(), Some("7"));
        let messages = conv.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Build an API");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "Here is");
        assert_eq!(messages[2].content, "And tests?");
        assert!(messages.iter().all(|m| m.state == MessageState::Complete));
    }

    #[test]
    fn record_without_queries_is_empty() {
        let record: ConversationRecord =
            serde_json::from_value(json!({"id": "abc"})).unwrap();
        let conv = record.into_conversation();
        assert_eq!(conv.id.as_deref(), Some("abc"));
        assert!(conv.is_empty());
    }

    #[test]
    fn summary_title_fallbacks() {
        let titled: ConversationRecord =
            serde_json::from_value(json!({"id": 1, "title": "Blog schema"})).unwrap();
        assert_eq!(titled.summary().title, "Blog schema");

        let from_query: ConversationRecord = serde_json::from_value(json!({
            "id": 2,
            "title": "  ",
            "queries": [{"query": "First question"}]
        }))
        .unwrap();
        assert_eq!(from_query.summary().title, "First question");

        let untitled: ConversationRecord = serde_json::from_value(json!({"id": 3})).unwrap();
        assert_eq!(untitled.summary().title, "New chat");
    }

    #[test]
    fn listing_skips_bad_entries() {
        let list = summaries_from_listing(json!([
            {"id": "a", "title": "One"},
            {"title": "no id"},
            {"id": 5}
        ]));
        let ids: Vec<_> = list.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "5"]);
    }

    #[test]
    fn listing_not_an_array() {
        assert!(summaries_from_listing(json!({"detail": "nope"})).is_empty());
    }

    // ─── Auth Helper Tests ───────────────────────────────────

    #[test]
    fn default_username_is_local_part() {
        assert_eq!(default_username("ada@example.com"), "ada");
        assert_eq!(default_username("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn registration_defaults_username() {
        let reg = Registration::new("ada@example.com", None, "pw", "Ada");
        assert_eq!(reg.username, "ada");
        let blank = Registration::new("ada@example.com", Some("  "), "pw", "Ada");
        assert_eq!(blank.username, "ada");
        let explicit = Registration::new("ada@example.com", Some("lovelace"), "pw", "Ada");
        assert_eq!(explicit.username, "lovelace");
    }

    #[test]
    fn login_response_without_token() {
        let body: LoginResponse = serde_json::from_value(json!({"token_type": "bearer"})).unwrap();
        assert!(body.access_token.is_none());
    }

    // ─── MemoryStorage Tests ─────────────────────────────────

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        block_on(async {
            assert!(storage.get(TOKEN_KEY).await.unwrap().is_none());
            storage.set(TOKEN_KEY, "t1").await.unwrap();
            storage.set(TOKEN_KEY, "t2").await.unwrap();
            assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("t2"));
            storage.delete(TOKEN_KEY).await.unwrap();
            assert!(storage.get(TOKEN_KEY).await.unwrap().is_none());
        });
        assert_eq!(storage.backend_name(), "memory");
    }
}
