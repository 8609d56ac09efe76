//! Integration tests for MCP protocol handling.
//!
//! These tests drive the dispatcher with decoded JSON values and check the
//! JSON-RPC envelopes it produces.

use std::sync::Arc;
use std::time::{Duration, Instant};

use kali_mcp::mcp::McpServer;
use kali_mcp::runner::ProcessRunner;
use kali_mcp::tools::ToolRegistry;
use serde_json::{json, Value};

const TOOL_NAMES: [&str; 11] = [
    "nmap_scan",
    "gobuster_scan",
    "dirb_scan",
    "nikto_scan",
    "sqlmap_scan",
    "wpscan_analyze",
    "enum4linux_scan",
    "hydra_attack",
    "john_crack",
    "metasploit_run",
    "execute_command",
];

fn server_with_timeout(timeout: Duration) -> McpServer {
    McpServer::new(Arc::new(ToolRegistry::kali()), ProcessRunner::new(timeout))
}

fn server() -> McpServer {
    server_with_timeout(Duration::from_secs(10))
}

async fn call(server: &McpServer, request: Value) -> Value {
    let reply = server.handle_value(request).await;
    serde_json::to_value(&reply).unwrap()
}

fn text_of(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

// =============================================================================
// Envelope
// =============================================================================

#[tokio::test]
async fn test_wrong_version_rejected() {
    let server = server();

    for version in [json!("1.0"), json!("2"), json!(2.0), json!(null), json!("")] {
        let response = call(
            &server,
            json!({"jsonrpc": version, "id": 9, "method": "initialize"}),
        )
        .await;

        assert_eq!(response["error"]["code"], -32600, "version {version}");
        assert_eq!(response["error"]["message"], "Invalid JSON-RPC version");
        assert_eq!(response["id"], 9);
        assert!(response.get("result").is_none());
    }
}

#[tokio::test]
async fn test_missing_version_accepted() {
    let response = call(&server(), json!({"id": 1, "method": "tools/list"})).await;

    assert!(response.get("error").is_none());
    assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 11);
}

#[tokio::test]
async fn test_unknown_method() {
    let server = server();

    for method in ["ping", "tools/remove", "INITIALIZE", ""] {
        let response = call(
            &server,
            json!({"jsonrpc": "2.0", "id": 3, "method": method}),
        )
        .await;

        assert_eq!(response["error"]["code"], -32601, "method {method:?}");
        assert_eq!(response["error"]["message"], "Method not found");
        assert!(response.get("result").is_none());
    }
}

#[tokio::test]
async fn test_non_object_request_is_method_not_found() {
    let server = server();

    for body in [json!(null), json!([1, 2]), json!("initialize"), json!(42)] {
        let response = call(&server, body).await;
        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(response["id"], Value::Null);
    }
}

#[tokio::test]
async fn test_id_round_trip() {
    let server = server();

    for id in [json!(1), json!("abc"), json!(null), json!({"k": [1]}), json!(1.5)] {
        let response = call(
            &server,
            json!({"jsonrpc": "2.0", "id": id, "method": "initialize"}),
        )
        .await;
        assert_eq!(response["id"], id);
    }
}

#[tokio::test]
async fn test_absent_id_echoed_as_null() {
    let response = call(&server(), json!({"jsonrpc": "2.0", "method": "initialize"})).await;

    let obj = response.as_object().unwrap();
    assert!(obj.contains_key("id"));
    assert_eq!(obj["id"], Value::Null);
}

#[tokio::test]
async fn test_error_replies_echo_id() {
    let response = call(&server(), json!({"jsonrpc": "1.0", "id": "x-1"})).await;
    assert_eq!(response["id"], "x-1");

    let response = call(&server(), json!({"jsonrpc": "2.0", "id": "x-2", "method": "nope"})).await;
    assert_eq!(response["id"], "x-2");
}

// =============================================================================
// initialize
// =============================================================================

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let server = server();

    let first = call(
        &server,
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}),
    )
    .await;
    let second = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2099-01-01",
                "clientInfo": {"name": "test-client", "version": "1.0.0"}
            }
        }),
    )
    .await;

    assert_eq!(first, second);
    assert_eq!(first["jsonrpc"], "2.0");
    assert_eq!(first["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(first["result"]["serverInfo"]["name"], "kali-mcp");
    assert!(first["result"]["capabilities"]["tools"].is_object());
}

// =============================================================================
// tools/list
// =============================================================================

#[tokio::test]
async fn test_tools_list_order_is_stable() {
    let server = server();

    for _ in 0..3 {
        let response = call(
            &server,
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        )
        .await;

        let names: Vec<&str> = response["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|tool| tool["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, TOOL_NAMES);
    }
}

#[tokio::test]
async fn test_tools_list_descriptor_shape() {
    let response = call(
        &server(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
    )
    .await;

    let hydra = &response["result"]["tools"][7];
    assert_eq!(hydra["name"], "hydra_attack");
    assert_eq!(hydra["description"], "Run Hydra brute force");
    assert_eq!(hydra["inputSchema"]["type"], "object");
    assert_eq!(hydra["inputSchema"]["required"], json!(["target", "service"]));
}

// =============================================================================
// tools/call
// =============================================================================

#[cfg(unix)]
#[tokio::test]
async fn test_execute_command_echo() {
    let response = call(
        &server(),
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {"name": "execute_command", "arguments": {"command": "echo hi"}}
        }),
    )
    .await;

    assert!(response.get("error").is_none());
    assert_eq!(response["result"]["content"][0]["type"], "text");
    assert!(text_of(&response).contains("hi"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_stderr_returned_when_stdout_empty() {
    let response = call(
        &server(),
        json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": {"name": "execute_command", "arguments": {"command": "echo bad >&2; exit 1"}}
        }),
    )
    .await;

    assert!(response.get("error").is_none());
    assert_eq!(text_of(&response).trim(), "bad");
}

#[tokio::test]
async fn test_unknown_tool_is_success_text() {
    let response = call(
        &server(),
        json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "tools/call",
            "params": {"name": "rm_everything", "arguments": {}}
        }),
    )
    .await;

    assert!(response.get("error").is_none());
    assert_eq!(text_of(&response), "Unknown tool: rm_everything");
}

#[tokio::test]
async fn test_missing_argument_is_success_text() {
    let response = call(
        &server(),
        json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": {"name": "nmap_scan"}
        }),
    )
    .await;

    assert!(response.get("error").is_none());
    assert_eq!(text_of(&response), "Missing required argument: target");
}

#[cfg(unix)]
#[tokio::test]
async fn test_timeout_is_success_text() {
    let server = server_with_timeout(Duration::from_millis(300));
    let started = Instant::now();

    let response = call(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 8,
            "method": "tools/call",
            "params": {"name": "execute_command", "arguments": {"command": "sleep 10"}}
        }),
    )
    .await;

    assert!(response.get("error").is_none());
    assert!(text_of(&response).contains("timed out"));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[cfg(unix)]
#[tokio::test]
async fn test_concurrent_calls_run_independently() {
    let server = server();

    let request = |word: &str| {
        json!({
            "jsonrpc": "2.0",
            "id": word,
            "method": "tools/call",
            "params": {"name": "execute_command", "arguments": {"command": format!("echo {word}")}}
        })
    };

    let (a, b) = tokio::join!(call(&server, request("alpha")), call(&server, request("beta")));

    assert_eq!(a["id"], "alpha");
    assert_eq!(text_of(&a).trim(), "alpha");
    assert_eq!(b["id"], "beta");
    assert_eq!(text_of(&b).trim(), "beta");
}
