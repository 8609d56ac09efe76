//! HTTP transport for the MCP server.
//!
//! - A single endpoint: `POST /`
//! - The request body is a JSON-RPC 2.0 request object
//! - The response body is the JSON-RPC 2.0 reply
//! - The HTTP status is always `200 OK`; protocol errors travel in the body
//!
//! Bodies are decoded by [`parse_request`] rather than axum's `Json` extractor so
//! that a malformed body or a missing content type still reaches the dispatcher
//! as an empty request instead of being rejected with a 4xx. The default body
//! size limit is disabled for the same reason.

use std::io;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;

use crate::mcp::protocol::{parse_request, JsonRpcReply};
use crate::mcp::server::McpServer;

/// Builds the router serving `server` at `POST /`.
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/", post(rpc_handler))
        .layer(DefaultBodyLimit::disable())
        .with_state(server)
}

async fn rpc_handler(State(server): State<Arc<McpServer>>, body: Bytes) -> Json<JsonRpcReply> {
    let request = parse_request(&body);
    Json(server.handle(request).await)
}

/// Serves requests on `listener` until SIGINT or SIGTERM is received.
///
/// # Errors
///
/// Returns an error if accepting connections fails or the shutdown signal
/// handlers cannot be installed.
pub async fn serve(listener: TcpListener, server: Arc<McpServer>) -> io::Result<()> {
    let shutdown = shutdown_signal()?;
    axum::serve(listener, router(server))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves once the process is asked to stop.
#[cfg(unix)]
fn shutdown_signal() -> io::Result<impl std::future::Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT, initiating graceful shutdown");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
        }
    })
}

/// Resolves once the process is asked to stop.
#[cfg(windows)]
#[allow(clippy::unnecessary_wraps)] // matches the unix signature
fn shutdown_signal() -> io::Result<impl std::future::Future<Output = ()>> {
    Ok(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
    })
}
