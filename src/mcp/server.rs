//! Request dispatch for the Kali tools server.
//!
//! [`McpServer`] turns one decoded request into one reply. It holds no
//! per-connection or per-request state: `initialize` may be called any number of
//! times, and `tools/list` and `tools/call` work without it.
//!
//! Tool-level failures (unknown tool, missing argument, launch error, timeout) are
//! never JSON-RPC errors. They come back as the text of a successful result.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};

use crate::mcp::protocol::{
    JsonRpcError, JsonRpcReply, JsonRpcRequest, JsonRpcResponse, Method, MCP_PROTOCOL_VERSION,
    SERVER_NAME,
};
use crate::runner::ProcessRunner;
use crate::tools::ToolRegistry;

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    pub tools: ToolCapabilities,
}

/// Tool-specific capabilities. Always serialised as `{}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
}

impl ToolCallResult {
    /// Creates a text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
        }
    }
}

/// The JSON-RPC dispatcher for the Kali tools server.
#[derive(Debug, Clone)]
pub struct McpServer {
    /// Tools available to `tools/list` and `tools/call`.
    registry: Arc<ToolRegistry>,
    /// Executes tool command lines.
    runner: ProcessRunner,
}

impl McpServer {
    /// Creates a server over a shared registry.
    #[must_use]
    pub const fn new(registry: Arc<ToolRegistry>, runner: ProcessRunner) -> Self {
        Self { registry, runner }
    }

    /// Returns the tool registry.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handles a decoded JSON value, treating non-objects as an empty request.
    pub async fn handle_value(&self, value: Value) -> JsonRpcReply {
        self.handle(JsonRpcRequest::from_value(value)).await
    }

    /// Handles one request and produces its reply.
    pub async fn handle(&self, req: JsonRpcRequest) -> JsonRpcReply {
        if !req.has_valid_version() {
            debug!(id = %req.id, "Rejecting request with invalid jsonrpc version");
            return JsonRpcError::invalid_version(req.id).into();
        }

        let Some(method) = req.known_method() else {
            debug!(id = %req.id, method = ?req.method, "Method not found");
            return JsonRpcError::method_not_found(req.id).into();
        };

        debug!(id = %req.id, %method, "Dispatching request");

        let result = match method {
            Method::Initialize => Self::handle_initialize(),
            Method::ToolsList => self.handle_tools_list(),
            Method::ToolsCall => self.handle_tools_call(&req.params).await,
        };

        JsonRpcResponse::success(req.id, result).into()
    }

    /// Handles the initialize request.
    fn handle_initialize() -> Value {
        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "serverInfo": ServerInfo::default(),
            "capabilities": ServerCapabilities::default(),
        })
    }

    /// Handles the tools/list request.
    fn handle_tools_list(&self) -> Value {
        json!({
            "tools": self.registry.descriptors(),
        })
    }

    /// Handles the tools/call request.
    async fn handle_tools_call(&self, params: &Map<String, Value>) -> Value {
        let result = self.call_tool(params).await;

        serde_json::to_value(&result).unwrap_or_else(|e| {
            error!(error = %e, "Failed to serialise tool call result");
            json!({ "content": [] })
        })
    }

    /// Resolves and runs the tool named in `params`.
    async fn call_tool(&self, params: &Map<String, Value>) -> ToolCallResult {
        let name = params.get("name").unwrap_or(&Value::Null);
        let empty = Map::new();
        let arguments = params
            .get("arguments")
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        let Some(tool) = name.as_str().and_then(|n| self.registry.get(n)) else {
            let shown = name.as_str().map_or_else(|| name.to_string(), str::to_string);
            info!(tool = %shown, "Unknown tool requested");
            return ToolCallResult::text(format!("Unknown tool: {shown}"));
        };

        let command = match tool.command_line(arguments) {
            Ok(command) => command,
            Err(e) => {
                info!(tool = tool.name(), error = %e, "Tool call rejected");
                return ToolCallResult::text(e.to_string());
            }
        };

        info!(tool = tool.name(), "Running tool");
        ToolCallResult::text(self.runner.run(&command).await)
    }
}
