//! kali-mcp: MCP server exposing Kali Linux security tools over JSON-RPC
//!
//! A remote agent discovers the available tools with `tools/list` and runs one with
//! `tools/call`, receiving the tool's captured output as text.
//!
//! # Architecture
//!
//! - **Transport**: `POST /` over HTTP, one JSON-RPC request per body
//! - **Dispatcher**: version check and routing of `initialize`, `tools/list`, `tools/call`
//! - **Tool registry**: a fixed, ordered catalog of command-line templates
//! - **Process runner**: `sh -c` with a wall-clock timeout
//!
//! Arguments are substituted into command lines without quoting and run through a
//! shell, and `execute_command` runs anything it is given. Deploy only where the
//! client is trusted with a shell on the host.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Error types
//! - [`mcp`] — MCP protocol implementation and HTTP transport
//! - [`runner`] — Bounded shell command execution
//! - [`tools`] — Tool catalog and command-line templates

pub mod config;
pub mod error;
pub mod mcp;
pub mod runner;
pub mod tools;
