//! Sidecar forwarding proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────┐
//!                     │                   SIDECAR                     │
//!   Client Request    │  ┌──────────┐   ┌──────────┐   ┌───────────┐  │
//!   ──────────────────┼─▶│  http    │──▶│ forward  │──▶│  client   │──┼──▶ Downstream
//!                     │  │ server   │   │  core    │   │  (hyper)  │  │
//!   Client Response   │  │ Trace id │   │ headers  │   │           │  │
//!   ◀─────────────────┼──│          │◀──│ relay    │◀──│           │◀─┼─── Downstream
//!                     │  └──────────┘   └──────────┘   └───────────┘  │
//!                     │        /_sidecar answered locally             │
//!                     └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use nanomesh::config::load_sidecar_config;
use nanomesh::observability::init_logging;
use nanomesh::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "sidecar")]
#[command(about = "Forwards every request to one configured downstream", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_sidecar_config(cli.config.as_deref())?;

    init_logging(&config.observability);
    tracing::info!("sidecar v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        downstream = %config.forwarding.downstream_base_url,
        request_headers = config.forwarding.request_headers.len(),
        response_headers = config.forwarding.response_headers.len(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
