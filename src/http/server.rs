//! HTTP server setup.
//!
//! # Responsibilities
//! - Assemble the registry into an Axum router
//! - Bind server to listener
//! - Stop gracefully on Ctrl+C or an explicit shutdown trigger

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::registry::RouteRegistry;
use crate::routing::{attach_routes, AssemblyError};

/// Broadcast trigger for stopping running servers.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Server for an assembled route table.
pub struct AppServer {
    router: Router,
    config: AppConfig,
}

impl AppServer {
    /// Assemble `registry` onto an empty router.
    pub fn new(config: AppConfig, registry: RouteRegistry) -> Result<Self, AssemblyError> {
        Self::with_router(config, Router::new(), registry)
    }

    /// Assemble `registry` onto an existing router, keeping its routes.
    pub fn with_router(config: AppConfig, app: Router, registry: RouteRegistry) -> Result<Self, AssemblyError> {
        let router = attach_routes(app, registry, &config.router)?;
        Ok(Self { router, config })
    }

    /// The assembled router, for serving elsewhere or testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Serve until Ctrl+C or `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => tracing::info!("Shutdown signal received"),
                    _ = shutdown.recv() => tracing::info!("Shutdown triggered"),
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
