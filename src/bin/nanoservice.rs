//! Echo/chain node.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use nanomesh::config::load_nanoservice_config;
use nanomesh::observability::init_logging;
use nanomesh::{NanoService, Shutdown};

#[derive(Parser)]
#[command(name = "nanoservice")]
#[command(about = "Echo node with delayed probes and an optional next hop", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_nanoservice_config(cli.config.as_deref())?;

    init_logging(&config.observability);
    tracing::info!("nanoservice v{} starting", env!("CARGO_PKG_VERSION"));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    NanoService::new(config)
        .run(listener, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
