//! Demo server for the annotated router.
//!
//! ```text
//! --config app.toml ─▶ load_config ─▶ AppConfig
//!                                        │
//! demo::register ─▶ RouteRegistry ──────▶ AppServer::new ─▶ axum::serve
//! ```

mod demo;

use std::path::PathBuf;

use annotated_router::config::{load_config, AppConfig};
use annotated_router::http::{AppServer, Shutdown};
use annotated_router::observability::{logging, metrics};
use annotated_router::RouteRegistry;
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "annotated-router")]
#[command(about = "Serve the demo controller through the annotated router", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);
    tracing::info!(
        bind_address = %config.listener.bind_address,
        body_limit_bytes = config.router.body_limit_bytes,
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

    let mut registry = RouteRegistry::new();
    demo::register(&mut registry);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = AppServer::new(config, registry)?;

    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
