//! JSON-RPC 2.0 message types for the MCP endpoint.
//!
//! Incoming requests are decoded leniently. Anything that is not a JSON object is
//! treated as an empty object, and fields of the wrong type are treated as absent.
//! The request `id` is kept as an opaque [`Value`] and echoed back unchanged
//! (`null` when the request had none).
//!
//! Every request yields exactly one [`JsonRpcReply`], which carries either a
//! `result` or an `error`, never both.

use serde::Serialize;
use serde_json::{Map, Value};

/// The JSON-RPC version accepted and emitted.
pub const JSONRPC_VERSION: &str = "2.0";

/// The MCP protocol version reported by `initialize`.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name for capability negotiation.
pub const SERVER_NAME: &str = "kali-mcp";

/// The closed set of methods this server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `initialize`
    Initialize,
    /// `tools/list`
    ToolsList,
    /// `tools/call`
    ToolsCall,
}

impl Method {
    /// Parses a method name. Returns `None` for anything outside the known set.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "initialize" => Some(Self::Initialize),
            "tools/list" => Some(Self::ToolsList),
            "tools/call" => Some(Self::ToolsCall),
            _ => None,
        }
    }

    /// Returns the wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::ToolsList => "tools/list",
            Self::ToolsCall => "tools/call",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leniently decoded JSON-RPC request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRpcRequest {
    /// The raw `jsonrpc` member, if present.
    pub jsonrpc: Option<Value>,

    /// Request identifier, echoed verbatim. `Null` when absent.
    pub id: Value,

    /// The method name, if present and a string.
    pub method: Option<String>,

    /// Parameters; empty when absent or not an object.
    pub params: Map<String, Value>,
}

impl JsonRpcRequest {
    /// Builds a request from a decoded JSON value.
    ///
    /// Non-object input produces a request with every field absent.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut obj) = value else {
            return Self::default();
        };

        let method = match obj.remove("method") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        let params = match obj.remove("params") {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        Self {
            jsonrpc: obj.remove("jsonrpc"),
            id: obj.remove("id").unwrap_or(Value::Null),
            method,
            params,
        }
    }

    /// Checks the `jsonrpc` member.
    ///
    /// An absent member is accepted. A present member must be exactly the
    /// string `"2.0"`.
    #[must_use]
    pub fn has_valid_version(&self) -> bool {
        match &self.jsonrpc {
            None => true,
            Some(Value::String(v)) => v == JSONRPC_VERSION,
            Some(_) => false,
        }
    }

    /// Resolves the method name against the known set.
    #[must_use]
    pub fn known_method(&self) -> Option<Method> {
        self.method.as_deref().and_then(Method::parse)
    }
}

/// Decodes a request body.
///
/// Bodies that are not valid JSON are treated as an empty object rather than
/// rejected.
#[must_use]
pub fn parse_request(body: &[u8]) -> JsonRpcRequest {
    serde_json::from_slice::<Value>(body)
        .map(JsonRpcRequest::from_value)
        .unwrap_or_default()
}

/// A successful JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this response corresponds to.
    pub id: Value,

    /// The result of the method call.
    pub result: Value,
}

impl JsonRpcResponse {
    /// Creates a new success response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

/// JSON-RPC 2.0 error codes emitted by this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The `jsonrpc` member is present but not "2.0".
    InvalidRequest,
    /// The method does not exist or is not available.
    MethodNotFound,
}

impl ErrorCode {
    /// Returns the numeric code for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
        }
    }

    /// Returns the message sent with this error code.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid JSON-RPC version",
            Self::MethodNotFound => "Method not found",
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorData {
    /// The error code.
    pub code: i32,

    /// A short description of the error.
    pub message: String,
}

impl JsonRpcErrorData {
    /// Creates a new error from an error code.
    #[must_use]
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code: code.code(),
            message: code.default_message().to_string(),
        }
    }
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this error corresponds to; `null` if the request had none.
    pub id: Value,

    /// The error details.
    pub error: JsonRpcErrorData,
}

impl JsonRpcError {
    /// Creates a new error response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // JsonRpcErrorData contains String
    pub fn new(id: Value, error: JsonRpcErrorData) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error,
        }
    }

    /// Creates an invalid version error response.
    #[must_use]
    pub fn invalid_version(id: Value) -> Self {
        Self::new(id, JsonRpcErrorData::from_code(ErrorCode::InvalidRequest))
    }

    /// Creates a method not found error response.
    #[must_use]
    pub fn method_not_found(id: Value) -> Self {
        Self::new(id, JsonRpcErrorData::from_code(ErrorCode::MethodNotFound))
    }
}

/// The single reply produced for a request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JsonRpcReply {
    /// Carries a `result`.
    Success(JsonRpcResponse),
    /// Carries an `error`.
    Error(JsonRpcError),
}

impl JsonRpcReply {
    /// Returns the echoed request ID.
    #[must_use]
    pub const fn id(&self) -> &Value {
        match self {
            Self::Success(resp) => &resp.id,
            Self::Error(err) => &err.id,
        }
    }

    /// Returns the result, if this is a success reply.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        match self {
            Self::Success(resp) => Some(&resp.result),
            Self::Error(_) => None,
        }
    }

    /// Returns the error details, if this is an error reply.
    #[must_use]
    pub const fn error(&self) -> Option<&JsonRpcErrorData> {
        match self {
            Self::Success(_) => None,
            Self::Error(err) => Some(&err.error),
        }
    }
}

impl From<JsonRpcResponse> for JsonRpcReply {
    fn from(resp: JsonRpcResponse) -> Self {
        Self::Success(resp)
    }
}

impl From<JsonRpcError> for JsonRpcReply {
    fn from(err: JsonRpcError) -> Self {
        Self::Error(err)
    }
}
