//! Wallet Summary Proxy
//!
//! A caching HTTP proxy for a third-party wallet-analytics endpoint,
//! built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │              WALLET SUMMARY PROXY                 │
//!                    │                                                   │
//!   GET /api/        │  ┌─────────┐   ┌──────────┐   ┌──────────────┐   │
//!   wallet-summary ──┼─▶│  http   │──▶│  cache   │──▶│   upstream   │───┼──▶ layerhub.xyz
//!   ?address=...     │  │ server  │   │ (5m TTL) │   │ client+retry │   │
//!                    │  └─────────┘   └──────────┘   └──────┬───────┘   │
//!                    │                                      │           │
//!   JSON summary ◀───┼───────────── summary transform ◀─────┘           │
//!                    │                                                   │
//!                    │  ┌────────────────────────────────────────────┐  │
//!                    │  │           Cross-Cutting Concerns            │  │
//!                    │  │  config · resilience · observability        │  │
//!                    │  └────────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallet_summary_proxy::config::{load_config, ProxyConfig};
use wallet_summary_proxy::http::HttpServer;
use wallet_summary_proxy::observability::metrics;

#[derive(Parser)]
#[command(name = "wallet-summary-proxy")]
#[command(about = "Caching proxy for a wallet-analytics summary endpoint", long_about = None)]
struct Args {
    /// Path to a TOML config file; built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "wallet_summary_proxy={},tower_http=info",
                    config.observability.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("wallet-summary-proxy v0.1.0 starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        protocol = %config.upstream.protocol,
        cache_ttl_secs = config.cache.ttl_secs,
        max_attempts = config.retries.max_attempts,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Create and run HTTP server
    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
