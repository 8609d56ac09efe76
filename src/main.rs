//! kali-mcp: MCP server exposing Kali Linux security tools over JSON-RPC
//!
//! Serves `initialize`, `tools/list` and `tools/call` on `POST /`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use kali_mcp::config;
use kali_mcp::mcp::{self, McpServer};
use kali_mcp::runner::ProcessRunner;
use kali_mcp::tools::ToolRegistry;

/// MCP server exposing Kali Linux security tools over JSON-RPC.
///
/// Accepts JSON-RPC 2.0 requests on `POST /` and runs the requested tool,
/// returning its captured output.
#[derive(Parser, Debug)]
#[command(name = "kali-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    ip: IpAddr,

    /// Port to bind
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns the startup notice required by GPLv3 Section 5d.
fn license_notice() -> String {
    format!(
        "kali-mcp {}  Copyright (C) 2026  The Embedded Society\n\
         This program comes with ABSOLUTELY NO WARRANTY.\n\
         This is free software, licensed under GPL-3.0-or-later.\n\
         Source: {}\n",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_REPOSITORY"),
    )
}

/// Binds the listener and serves until shutdown.
async fn run(addr: SocketAddr, server: Arc<McpServer>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening for JSON-RPC requests on POST /");
    mcp::serve(listener, server).await
}

/// Entry point for the kali-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    // Display GPL license notice (required by GPLv3 Section 5d)
    eprintln!("{}", license_notice());

    let registry = Arc::new(ToolRegistry::kali_with_wordlist(&cfg.execution.wordlist));
    let runner = ProcessRunner::new(Duration::from_secs(cfg.execution.timeout_secs));

    info!(
        version = env!("CARGO_PKG_VERSION"),
        tools = registry.len(),
        timeout_secs = cfg.execution.timeout_secs,
        "Starting kali-mcp server"
    );

    let server = Arc::new(McpServer::new(registry, runner));
    let addr = SocketAddr::new(args.ip, args.port);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(addr, server)) {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, %addr, "Server error");
            ExitCode::FAILURE
        }
    }
}
