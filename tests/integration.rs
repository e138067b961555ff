#![cfg(test)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use letschat_notify::{
    base::{
        config::{Config, ConfigInner},
        types::{FieldValue, Fields, Ticket},
    },
    interaction::notify::handle_event,
    prelude::Event,
    runtime::Runtime,
    service::chat::{ChatClient, GenericChatClient},
};
use mockall::mock;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

// Mocks.

// Mock chat client for testing.

mock! {
    pub Chat {}

    #[async_trait]
    impl GenericChatClient for Chat {
        async fn send_message(&self, room: &str, text: &str) -> bool;
    }
}

/// Helper function to create the test configuration.
fn create_test_config(webapi: &str) -> ConfigInner {
    ConfigInner {
        webapi: webapi.to_string(),
        token: "secret".to_string(),
        ticket_room: "tickets".to_string(),
        wiki_room: "wiki".to_string(),
        blog_room: "blog".to_string(),
        janusgw_room: "phone".to_string(),
        ticket_fields: "type,priority,component,resolution".to_string(),
        ignore_tickets: "99".to_string(),
        date_format: "%Y/%m/%d".to_string(),
        request_timeout_ms: 1000,
        ..Default::default()
    }
}

/// Helper function to setup a runtime around a mocked chat client.
fn setup_test_runtime(mock: MockChat) -> Runtime {
    let config = Config::from(create_test_config("http://chat.invalid"));

    Runtime::with_chat(config, ChatClient::new(Arc::new(mock)))
}

fn ticket(id: u64, pairs: &[(&str, &str)]) -> Ticket {
    Ticket {
        id,
        url: format!("http://trac/ticket/{id}"),
        fields: pairs.iter().map(|(k, v)| (k.to_string(), FieldValue::from(*v))).collect(),
    }
}

#[tokio::test]
async fn test_ticket_created_is_posted_to_ticket_room() {
    let mut mock = MockChat::new();
    mock.expect_send_message()
        .withf(|room, text| room == "tickets" && text.starts_with("New Defect #42: Fix bug (by Alice)\n"))
        .times(1)
        .returning(|_, _| true);

    let runtime = setup_test_runtime(mock);
    let event = Event::TicketCreated {
        ticket: ticket(42, &[("type", "defect"), ("summary", "Fix bug"), ("reporter", "alice")]),
    };

    assert!(runtime.notify(&event).await.unwrap());
}

#[tokio::test]
async fn test_ignored_ticket_never_dispatches() {
    let mut mock = MockChat::new();
    mock.expect_send_message().times(0);

    let runtime = setup_test_runtime(mock);
    let event = Event::TicketChanged {
        ticket: ticket(99, &[("type", "task"), ("summary", "Noise")]),
        author: Some("bob".into()),
        comment: Some("again".into()),
        old_values: Fields::new(),
        comment_number: None,
    };

    assert!(runtime.notify(&event).await.unwrap());
}

#[tokio::test]
async fn test_automation_comment_never_dispatches() {
    let mut mock = MockChat::new();
    mock.expect_send_message().times(0);

    let runtime = setup_test_runtime(mock);
    let event = Event::TicketChanged {
        ticket: ticket(3, &[("type", "task"), ("summary", "Hours")]),
        author: Some("bot".into()),
        comment: Some("hamster sum added".into()),
        old_values: Fields::new(),
        comment_number: None,
    };

    assert!(runtime.notify(&event).await.unwrap());
}

#[tokio::test]
async fn test_render_error_sends_nothing() {
    let mut mock = MockChat::new();
    mock.expect_send_message().times(0);

    let runtime = setup_test_runtime(mock);
    let event = Event::TicketCreated { ticket: ticket(4, &[("summary", "No type"), ("reporter", "alice")]) };

    let err = runtime.notify(&event).await.unwrap_err();

    assert!(err.to_string().contains("type"));
}

#[tokio::test]
async fn test_delivery_failure_is_reported_as_false() {
    let mut mock = MockChat::new();
    mock.expect_send_message().times(1).returning(|_, _| false);

    let runtime = setup_test_runtime(mock);
    let event = Event::MissedCall { caller: "carol".into(), callee: "dave".into(), comment: None };

    assert!(!runtime.notify(&event).await.unwrap());
}

#[tokio::test]
async fn test_wiki_edit_is_posted_to_wiki_room() {
    let mut mock = MockChat::new();
    mock.expect_send_message()
        .withf(|room, text| room == "wiki" && text.contains("Changes (by Bob)\n * Version: 2\n"))
        .times(1)
        .returning(|_, _| true);

    let runtime = setup_test_runtime(mock);
    let event: Event = serde_json::from_value(serde_json::json!({
        "event": "wiki_page_changed",
        "page": { "name": "Guide", "url": "http://trac/wiki/Guide" },
        "author": "bob",
        "version": 2,
        "time": "2024-01-02T03:04:05Z",
    }))
    .unwrap();

    assert!(runtime.notify(&event).await.unwrap());
}

#[tokio::test]
async fn test_handle_event_runs_in_background() {
    let mut mock = MockChat::new();
    mock.expect_send_message().withf(|room, _| room == "blog").times(1).returning(|_, _| true);

    let runtime = setup_test_runtime(mock);
    let event: Event = serde_json::from_value(serde_json::json!({
        "event": "blog_comment_added",
        "post": { "name": "hello", "title": "Hello", "url": "http://trac/blog/hello" },
        "author": "mia",
        "comment": "nice post",
    }))
    .unwrap();

    assert!(handle_event(event, runtime).await.unwrap());
}

#[tokio::test]
async fn test_handle_event_logs_render_errors() {
    let mut mock = MockChat::new();
    mock.expect_send_message().times(0);

    let runtime = setup_test_runtime(mock);
    let event = Event::TicketCreated { ticket: ticket(4, &[("type", "task"), ("summary", "No reporter")]) };

    assert!(!handle_event(event, runtime).await.unwrap());
}

#[tokio::test]
async fn test_letschat_posts_form_with_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/phone/messages"))
        .and(header("authorization", "Basic c2VjcmV0OmR1bW15"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("text=Missed+call+from+carol+to+%40dave."))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = Runtime::new(Config::from(create_test_config(&server.uri()))).unwrap();
    let event = Event::MissedCall { caller: "carol".into(), callee: "dave".into(), comment: None };

    assert!(runtime.notify(&event).await.unwrap());
}

#[tokio::test]
async fn test_letschat_server_error_returns_false() {
    let server = MockServer::start().await;

    Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

    let client = ChatClient::letschat(&Config::from(create_test_config(&server.uri()))).unwrap();

    assert!(!client.send_message("tickets", "hello").await);
}

#[tokio::test]
async fn test_letschat_timeout_returns_false() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1500)))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.request_timeout_ms = 100;
    let client = ChatClient::letschat(&Config::from(config)).unwrap();

    assert!(!client.send_message("tickets", "hello").await);
}

#[tokio::test]
async fn test_letschat_unreachable_returns_false() {
    let runtime = Runtime::new(Config::from(create_test_config("http://127.0.0.1:9"))).unwrap();
    let event = Event::MissedCall { caller: "carol".into(), callee: "dave".into(), comment: None };

    assert!(!runtime.notify(&event).await.unwrap());
}

#[test]
fn test_field_changes_from_json_keep_order() {
    let old: Fields = serde_json::from_str(r#"{ "priority": "minor", "component": "ui" }"#).unwrap();

    let keys: Vec<&String> = old.keys().collect();
    assert_eq!(keys, vec!["priority", "component"]);
}
