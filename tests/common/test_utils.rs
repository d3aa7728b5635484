use super::mocks::MockBackend;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use chat_gateway::{
    gateway::ChatGateway,
    server::{self, AppState},
};
use serde_json::Value;
use std::sync::Arc;

pub const TEST_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_MODEL: &str = "deepseek-r1:7b";

/// Build the full router around a mock backend
pub fn create_test_app(backend: MockBackend) -> Router {
    let gateway = ChatGateway::new(Arc::new(backend), DEFAULT_MODEL);
    server::router(AppState::new(gateway), TEST_ORIGIN).unwrap()
}

pub fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn models_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/api/models")
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
