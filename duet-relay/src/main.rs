use anyhow::{Context, Result};
use clap::Parser;
use duet_relay::{RelayService, serve};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Presence and pub/sub relay for duet clients.
#[derive(Parser)]
#[command(name = "duet-relay", version)]
struct Args {
    /// Address to accept WebSocket connections on.
    #[arg(long, default_value = "0.0.0.0:8787")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;

    serve(listener, RelayService::new())
        .await
        .context("Relay server stopped")
}
