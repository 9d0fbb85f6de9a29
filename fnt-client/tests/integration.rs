//! Integration tests against an in-process mock tiddler server.
//!
//! The server keeps tiddlers in memory keyed by container and title, assigns
//! an increasing revision on every PUT and answers 404 for anything missing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use fnt_client::{
    EventBus, FntError, Method, NotifyingClient, Tiddler, TiddlerEvent, TiddlyWebClient,
    format_timestamp, parse_timestamp,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

const MODIFIED: &str = "20210615143022500";
const CREATED: &str = "202001011200";

#[derive(Clone, Default)]
struct MockState {
    tiddlers: Arc<Mutex<HashMap<(String, String), Value>>>,
    revision: Arc<AtomicUsize>,
    requests: Arc<AtomicUsize>,
}

async fn get_tiddler(
    State(state): State<MockState>,
    Path((container, title)): Path<(String, String)>,
) -> Result<Json<Value>, (StatusCode, String)> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let tiddlers = state.tiddlers.lock().unwrap();
    let stored = tiddlers
        .get(&(container, title.clone()))
        .ok_or((StatusCode::NOT_FOUND, format!("{} not found", title)))?;

    Ok(Json(json!({
        "title": title,
        "text": stored["text"],
        "render": format!("<p>{}</p>", stored["text"].as_str().unwrap_or("")),
        "tags": stored["tags"],
        "type": stored["type"],
        "fields": stored["fields"],
        "modifier": "GUEST",
        "modified": MODIFIED,
        "creator": "GUEST",
        "created": CREATED,
        "revision": stored["revision"]
    })))
}

async fn put_tiddler(
    State(state): State<MockState>,
    Path((container, title)): Path<(String, String)>,
    Json(mut body): Json<Value>,
) -> StatusCode {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if body["title"] != json!(title) {
        return StatusCode::BAD_REQUEST;
    }
    let revision = state.revision.fetch_add(1, Ordering::SeqCst) + 1;
    body["revision"] = json!(revision);
    state
        .tiddlers
        .lock()
        .unwrap()
        .insert((container, title), body);
    StatusCode::NO_CONTENT
}

async fn delete_tiddler(
    State(state): State<MockState>,
    Path((container, title)): Path<(String, String)>,
) -> (StatusCode, String) {
    state.requests.fetch_add(1, Ordering::SeqCst);
    match state.tiddlers.lock().unwrap().remove(&(container, title.clone())) {
        Some(_) => (StatusCode::NO_CONTENT, String::new()),
        None => (StatusCode::NOT_FOUND, format!("{} not found", title)),
    }
}

/// Starts the mock server on an ephemeral port and returns its base URL.
async fn spawn_server() -> (String, MockState) {
    let state = MockState::default();
    let app = Router::new()
        .route(
            "/bags/:container/tiddlers/:title",
            get(get_tiddler).put(put_tiddler).delete(delete_tiddler),
        )
        .route(
            "/recipes/:container/tiddlers/:title",
            get(get_tiddler).put(put_tiddler).delete(delete_tiddler),
        )
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

fn sample_tiddler(host: &str) -> Tiddler {
    let mut tiddler = Tiddler::new("Hello There")
        .with_host(host)
        .in_bag("common")
        .with_text("Welcome!");
    tiddler.tags = vec!["intro".to_string(), "greeting".to_string()];
    tiddler.tiddler_type = Some("text/x-markdown".to_string());
    tiddler.fields.insert("color".to_string(), "blue".to_string());
    tiddler
}

#[tokio::test]
async fn put_then_get_round_trip() {
    let (host, _state) = spawn_server().await;
    let client = TiddlyWebClient::new();

    let written = sample_tiddler(&host);
    client.put(&written).await.unwrap();

    let mut read = Tiddler::new("Hello There").with_host(&host).in_bag("common");
    client.get(&mut read).await.unwrap();

    assert_eq!(read.title(), "Hello There");
    assert_eq!(read.bag(), Some("common"));
    assert_eq!(read.host(), Some(host.as_str()));
    assert_eq!(read.text.as_deref(), Some("Welcome!"));
    assert_eq!(read.tags, written.tags);
    assert_eq!(read.tiddler_type, written.tiddler_type);
    assert_eq!(read.fields, written.fields);
    assert_eq!(read.render(), Some("<p>Welcome!</p>"));
    assert_eq!(read.modifier(), Some("GUEST"));
    assert_eq!(read.revision(), Some("1"));
    assert_eq!(read.modified().map(|m| format_timestamp(&m)).as_deref(), Some(MODIFIED));
    assert_eq!(read.created(), Some(parse_timestamp(CREATED).unwrap()));
}

#[tokio::test]
async fn update_replaces_content() {
    let (host, _state) = spawn_server().await;
    let client = TiddlyWebClient::new();

    let mut tiddler = sample_tiddler(&host);
    client.put(&tiddler).await.unwrap();

    tiddler.text = Some("Updated".to_string());
    tiddler.tags.clear();
    client.put(&tiddler).await.unwrap();

    let mut read = Tiddler::new("Hello There").with_host(&host).in_bag("common");
    client.get(&mut read).await.unwrap();
    assert_eq!(read.text.as_deref(), Some("Updated"));
    assert!(read.tags.is_empty());
    assert_eq!(read.revision(), Some("2"));
}

#[tokio::test]
async fn get_missing_reports_not_found_and_leaves_tiddler() {
    let (host, _state) = spawn_server().await;
    let client = TiddlyWebClient::new();

    let mut tiddler = sample_tiddler(&host);
    let before = tiddler.clone();

    let err = client.get(&mut tiddler).await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.method(), Some(Method::Get));
    match &err {
        FntError::Status { message, .. } => {
            assert!(message.starts_with("Not Found\n"));
            assert!(message.contains("Hello There not found"));
        }
        other => panic!("Expected status error, got {:?}", other),
    }
    assert_eq!(tiddler, before);
}

#[tokio::test]
async fn repeated_delete_surfaces_not_found() {
    let (host, _state) = spawn_server().await;
    let client = TiddlyWebClient::new();

    let tiddler = sample_tiddler(&host);
    client.put(&tiddler).await.unwrap();
    client.delete(&tiddler).await.unwrap();

    let err = client.delete(&tiddler).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.method(), Some(Method::Delete));

    let mut read = Tiddler::new("Hello There").with_host(&host).in_bag("common");
    assert_eq!(client.get(&mut read).await.unwrap_err().status(), Some(404));
}

#[tokio::test]
async fn recipe_addressing() {
    let (host, _state) = spawn_server().await;
    let client = TiddlyWebClient::new();

    let tiddler = Tiddler::new("Site Map")
        .with_host(&host)
        .in_recipe("default")
        .with_text("* Home");
    client.put(&tiddler).await.unwrap();

    let mut read = Tiddler::new("Site Map").with_host(&host).in_recipe("default");
    client.get(&mut read).await.unwrap();
    assert_eq!(read.text.as_deref(), Some("* Home"));
    assert_eq!(read.recipe(), Some("default"));

    // Same name as a bag is a different resource.
    let mut in_bag = Tiddler::new("Site Map").with_host(&host).in_bag("default");
    assert_eq!(client.get(&mut in_bag).await.unwrap_err().status(), Some(404));
}

#[tokio::test]
async fn configuration_error_sends_no_request() {
    let (host, state) = spawn_server().await;
    let client = TiddlyWebClient::new();

    let no_container = Tiddler::new("Orphan").with_host(&host).with_text("x");
    assert!(client.put(&no_container).await.unwrap_err().is_configuration());
    assert!(client.delete(&no_container).await.unwrap_err().is_configuration());

    let mut no_host = Tiddler::new("Orphan").in_bag("common");
    assert!(client.get(&mut no_host).await.unwrap_err().is_configuration());

    assert_eq!(state.requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn notifying_client_publishes_outcomes() {
    let (host, _state) = spawn_server().await;
    let client = NotifyingClient::new(TiddlyWebClient::new(), EventBus::default());
    let mut events = client.subscribe();

    let mut tiddler = sample_tiddler(&host);
    client.put(&tiddler).await.unwrap();
    client.get(&mut tiddler).await.unwrap();
    client.delete(&tiddler).await.unwrap();
    assert!(client.delete(&tiddler).await.is_err());

    let names: Vec<&str> = [
        events.recv().await.unwrap(),
        events.recv().await.unwrap(),
        events.recv().await.unwrap(),
    ]
    .iter()
    .map(TiddlerEvent::name)
    .collect();
    assert_eq!(names, vec!["tiddlerPut", "tiddlerGet", "tiddlerDelete"]);

    match events.recv().await.unwrap() {
        TiddlerEvent::Error(e) => {
            assert_eq!(e.method, Method::Delete);
            assert_eq!(e.status, Some(404));
            assert_eq!(e.tiddler.title(), "Hello There");
        }
        other => panic!("Expected error event, got {}", other.name()),
    }
}

#[tokio::test]
async fn get_chained_on_put_notification_sees_new_content() {
    let (host, _state) = spawn_server().await;
    let client = NotifyingClient::new(TiddlyWebClient::new(), EventBus::default());
    let mut events = client.subscribe();

    let reader = client.clone();
    let reader_host = host.clone();
    let follow_up = tokio::spawn(async move {
        loop {
            if let TiddlerEvent::Put(written) = events.recv().await.unwrap() {
                let mut read = Tiddler::new(written.title())
                    .with_host(&reader_host)
                    .in_bag("common");
                reader.get(&mut read).await.unwrap();
                return read;
            }
        }
    });

    let tiddler = sample_tiddler(&host).with_text("Freshly written");
    client.put(&tiddler).await.unwrap();

    let read = follow_up.await.unwrap();
    assert_eq!(read.text.as_deref(), Some("Freshly written"));
}

#[tokio::test]
async fn unreachable_server_is_transport_error_without_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = TiddlyWebClient::new();
    let tiddler = sample_tiddler(&format!("http://{}", addr));

    let err = client.delete(&tiddler).await.unwrap_err();

    assert!(matches!(err, FntError::Http { .. }));
    assert!(err.is_transport());
    assert!(!err.is_configuration());
    assert_eq!(err.method(), Some(Method::Delete));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn notifying_get_of_missing_tiddler_publishes_error() {
    let (host, _state) = spawn_server().await;
    let client = NotifyingClient::new(TiddlyWebClient::new(), EventBus::default());
    let mut events = client.subscribe();

    let mut tiddler = sample_tiddler(&host);
    let before = tiddler.clone();
    assert!(client.get(&mut tiddler).await.is_err());

    match events.recv().await.unwrap() {
        TiddlerEvent::Error(e) => {
            assert_eq!(e.method, Method::Get);
            assert_eq!(e.status, Some(404));
            assert!(e.msg.starts_with("Not Found\n"));
            assert_eq!(e.tiddler, before);
        }
        other => panic!("Expected error event, got {}", other.name()),
    }
    assert_eq!(tiddler, before);
}
