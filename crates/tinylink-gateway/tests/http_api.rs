use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tinylink_core::{store, Alias, Link, LinkStore, StoreError};
use tinylink_gateway::{App, AppState};
use tinylink_shortener::{LinkService, LinkServiceConfig};
use tinylink_storage::InMemoryLinkStore;
use tower::ServiceExt;

struct UnavailableStore;

#[async_trait]
impl LinkStore for UnavailableStore {
    async fn add(&self, _link: Link) -> store::Result<Alias> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn get_by_alias(&self, _alias: &Alias) -> store::Result<Link> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

fn app_with(store: Arc<dyn LinkStore>, max_retries: usize) -> Router {
    let config = LinkServiceConfig::builder().host("example.com").build();
    let service = LinkService::with_random_generator(store, None, config).unwrap();
    App::router(AppState::new(Arc::new(service), max_retries))
}

fn app() -> Router {
    app_with(Arc::new(InMemoryLinkStore::new()), 5)
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn save(app: &Router, url: &str) -> String {
    let (status, body) = send(app, post("/api/v1/link", json!({ "url": url }).to_string())).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["link"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health() {
    let (status, body) = send(&app(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn save_then_resolve() {
    let app = app();

    let (status, body) = send(
        &app,
        post("/api/v1/link", r#"{"url":"https://www.google.com"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body.get("error").is_none());

    let short = body["link"].as_str().unwrap();
    let alias = short.strip_prefix("https://example.com/").unwrap();
    assert_eq!(alias.len(), 10);

    let (status, body) = send(&app, get(&format!("/api/v1/link/{alias}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "OK", "link": "https://www.google.com" })
    );
}

#[tokio::test]
async fn trailing_slash_is_accepted_on_save() {
    let app = app();

    let (status, body) = send(
        &app,
        post("/api/v1/link/", r#"{"url":"https://example.org"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn saving_twice_returns_the_same_link() {
    let app = app();

    let first = save(&app, "https://example.org/page").await;
    let second = save(&app, "https://example.org/page").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let (status, body) = send(&app(), post("/api/v1/link", Body::empty())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "status": "Error", "error": "empty request" }));
}

#[tokio::test]
async fn undecodable_body_is_rejected() {
    let (status, body) = send(&app(), post("/api/v1/link", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "status": "Error", "error": "failed to decode request" })
    );
}

#[tokio::test]
async fn missing_url_is_rejected() {
    let app = app();

    for payload in ["{}", r#"{"url":""}"#] {
        let (status, body) = send(&app, post("/api/v1/link", payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body["status"], "BadRequest");
    }
}

#[tokio::test]
async fn invalid_url_is_rejected() {
    let (status, body) = send(&app(), post("/api/v1/link", r#"{"url":"invalid-url"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "status": "BadRequest", "error": "Passed invalid url to shorten" })
    );
}

#[tokio::test]
async fn exhausted_retries_are_a_server_error() {
    let app = app_with(Arc::new(InMemoryLinkStore::new()), 0);

    let (status, body) = send(
        &app,
        post("/api/v1/link", r#"{"url":"https://example.org"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "status": "Error", "error": "max retries exceeded" })
    );
}

#[tokio::test]
async fn storage_failure_on_save_is_a_server_error() {
    let app = app_with(Arc::new(UnavailableStore), 5);

    let (status, body) = send(
        &app,
        post("/api/v1/link", r#"{"url":"https://example.org"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "status": "Error", "error": "failed to add url" }));
}

#[tokio::test]
async fn malformed_link_is_rejected() {
    let app = app();

    for link in ["short", "abcdefghijk", "abcde-ghij"] {
        let (status, body) = send(&app, get(&format!("/api/v1/link/{link}"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{link}");
        assert_eq!(
            body,
            json!({ "status": "BadRequest", "error": "Passed invalid short link" })
        );
    }
}

#[tokio::test]
async fn unknown_link_is_not_found() {
    let (status, body) = send(&app(), get("/api/v1/link/abcdefghij")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "status": "NotFound", "error": "url was not found" })
    );
}

#[tokio::test]
async fn storage_failure_on_lookup_is_a_server_error() {
    let app = app_with(Arc::new(UnavailableStore), 5);

    let (status, body) = send(&app, get("/api/v1/link/abcdefghij")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "status": "Error", "error": "failed to find url" }));
}
