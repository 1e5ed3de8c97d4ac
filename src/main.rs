//! App gate server.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌───────────────────────────────────────────────┐
//!                       │                   APP GATE                    │
//!  Client Request       │  ┌────────────┐   ┌───────────┐   ┌────────┐  │
//!  ─────────────────────┼─▶│ request id │──▶│  access   │──▶│ router │  │
//!                       │  │  + trace   │   │   gate    │   └───┬────┘  │
//!                       │  └────────────┘   └─────┬─────┘       │       │
//!                       │                         │             │       │
//!                       │              session lookup     ┌─────┴─────┐ │
//!                       │                   (Supabase)    │ insights  │ │──▶ PostgREST
//!  Client Response      │                                 │ / proxy   │ │──▶ Upstream app
//!  ◀────────────────────┼─────────────────────────────────└───────────┘ │
//!                       └───────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use app_gate::config::{load_config, load_default_config};
use app_gate::lifecycle::{shutdown_signal, Shutdown};
use app_gate::net::tls::load_listener_tls;
use app_gate::observability::{logging, metrics};
use app_gate::HttpServer;

#[derive(Parser)]
#[command(name = "app-gate")]
#[command(about = "Authentication gate and insights API", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "APP_GATE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_default_config()?,
    };

    logging::init_logging(&config.observability);
    tracing::info!("app-gate v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        request_timeout_secs = config.timeouts.request_secs,
        config_file = ?args.config,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    match tls {
        Some(tls) => {
            let rustls = load_listener_tls(&tls).await?;
            let addr: SocketAddr = bind_address.parse()?;
            server.run_tls(addr, rustls, server_shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, server_shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
