use super::*;
use crate::library::test_helpers::{MockExtractor, MockFeed, create_test_library};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

mod tasks;

/// Router over a fresh library with mock collaborators
async fn create_test_app(feed: MockFeed) -> (Router, Arc<MediaLibrary>, tempfile::TempDir) {
    let (library, temp_dir) =
        create_test_library(Arc::new(MockExtractor::default()), Arc::new(feed)).await;
    let library = Arc::new(library);
    let config = Arc::new(library.config().clone());
    (create_router(library.clone(), config), library, temp_dir)
}

async fn create_default_test_app() -> (Router, Arc<MediaLibrary>, tempfile::TempDir) {
    create_test_app(MockFeed::new("Empty Show", Vec::new())).await
}

/// Send one request and decode the JSON body (Null when empty)
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
