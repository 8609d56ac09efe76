//! Integration tests for the HTTP transport.
//!
//! Requests are driven through the axum router in-process; no socket is bound.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use kali_mcp::mcp::{self, McpServer};
use kali_mcp::runner::ProcessRunner;
use kali_mcp::tools::ToolRegistry;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let server = McpServer::new(
        Arc::new(ToolRegistry::kali()),
        ProcessRunner::new(Duration::from_secs(10)),
    );
    mcp::router(Arc::new(server))
}

async fn post(body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_initialize_over_http() {
    let (status, body) = post(
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["protocolVersion"], "2024-11-05");
}

#[tokio::test]
async fn test_protocol_errors_use_http_ok() {
    let (status, body) =
        post(json!({"jsonrpc": "1.0", "id": 2, "method": "initialize"}).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32600);

    let (status, body) =
        post(json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"}).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32601);
}

#[tokio::test]
async fn test_malformed_body_is_method_not_found() {
    let (status, body) = post("{this is not json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["id"], Value::Null);
    assert_eq!(body["error"]["code"], -32601);
}

#[tokio::test]
async fn test_empty_body_is_method_not_found() {
    let (status, body) = post(Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32601);
}

#[tokio::test]
async fn test_missing_content_type_still_dispatched() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .body(Body::from(
            json!({"jsonrpc": "2.0", "id": 4, "method": "tools/list"}).to_string(),
        ))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 11);
}

#[cfg(unix)]
#[tokio::test]
async fn test_tools_call_over_http() {
    let (status, body) = post(
        json!({
            "jsonrpc": "2.0",
            "id": "call-1",
            "method": "tools/call",
            "params": {"name": "execute_command", "arguments": {"command": "echo hi"}}
        })
        .to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "call-1");
    assert_eq!(body["result"]["content"][0]["text"].as_str().unwrap().trim(), "hi");
}

#[cfg(unix)]
#[tokio::test]
async fn test_large_body_reaches_dispatcher() {
    let padding = "x".repeat(3 * 1024 * 1024);
    let (status, body) = post(
        json!({
            "jsonrpc": "2.0",
            "id": "big",
            "method": "tools/call",
            "params": {
                "name": "execute_command",
                "arguments": {"command": "echo large", "padding": padding}
            }
        })
        .to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "big");
    assert_eq!(body["result"]["content"][0]["text"].as_str().unwrap().trim(), "large");
}

#[tokio::test]
async fn test_get_not_allowed() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
