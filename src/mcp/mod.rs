//! Model Context Protocol (MCP) server implementation.
//!
//! This module exposes the Kali tool catalog as MCP tools over a single JSON-RPC
//! 2.0 HTTP endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          MCP Server                          │
//! │                                                              │
//! │   ┌─────────────┐    ┌─────────────┐    ┌──────────────┐     │
//! │   │  Transport  │───▶│   Server    │───▶│    Tools     │     │
//! │   │ (HTTP POST) │    │ (dispatch)  │    │  (registry)  │     │
//! │   └─────────────┘    └─────────────┘    └──────────────┘     │
//! │                             │                  │             │
//! │                             ▼                  ▼             │
//! │                      ┌─────────────────────────────┐         │
//! │                      │   Process Runner (sh -c)    │         │
//! │                      └─────────────────────────────┘         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation reports MCP protocol version 2024-11-05.

pub mod protocol;
pub mod server;
pub mod transport;

pub use protocol::{
    parse_request, JsonRpcError, JsonRpcReply, JsonRpcRequest, JsonRpcResponse, Method,
    MCP_PROTOCOL_VERSION,
};
pub use server::McpServer;
pub use transport::{router, serve};
