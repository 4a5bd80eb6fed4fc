//! geo-gateway
//!
//! Edge gateway in front of a Hugo site.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                   GEO GATEWAY                    │
//!                         │                                                  │
//!   Client Request        │  ┌────────┐   ┌──────────┐   /docs   ┌────────┐  │
//!   ──────────────────────┼─▶│  http  │──▶│ routing  │──────────▶│  docs  │  │
//!                         │  │ server │   │classifier│  /swagger └────────┘  │
//!                         │  └────────┘   └────┬─────┘                       │
//!                         │                    │ /api       ┌─────────────┐  │
//!                         │                    ├───────────▶│ api + auth  │──┼──▶ DaData
//!                         │                    │            │  geocoding  │  │
//!                         │                    │            └─────────────┘  │
//!                         │                    │ anything else ┌─────────┐   │
//!                         │                    └──────────────▶│  proxy  │───┼──▶ Backend
//!                         │                                    └─────────┘   │
//!                         │  config · observability · lifecycle              │
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use geo_gateway::config::{load_config, load_default};
use geo_gateway::lifecycle::signals::spawn_signal_handler;
use geo_gateway::observability::{logging, metrics};
use geo_gateway::{HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "geo-gateway", version, about = "Edge gateway with an authenticated geocoding API")]
struct Args {
    /// Path to a TOML config file. Defaults plus environment when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_default()?,
    };

    logging::init(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "geo-gateway starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.address,
        test_mode = config.geocoding.test_mode.enabled,
        request_timeout_secs = ?config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    spawn_signal_handler(shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
