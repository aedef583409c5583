//! Axum server bootstrap.
//!
//! Owns the stores shared between the acquisition loop and the HTTP
//! handlers, and runs the server until shutdown.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tds530_core::Settings;
use tds530_runtime::{LatestSample, StatusTracker};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::routes::{create_router, create_spa_router};
use crate::sse::SseBroadcaster;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    /// Port for the HTTP server; 0 picks a free port.
    pub port: u16,
    /// Directory with the web UI. `None` serves the API only.
    pub static_dir: Option<PathBuf>,
    pub cors: CorsConfig,
}

impl ServerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            host: settings.effective_http_host().to_string(),
            port: settings.effective_http_port(),
            static_dir: None,
            cors: CorsConfig::default(),
        }
    }

    /// Set the static directory for UI serving.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::with_defaults())
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// Most recent sample, fed by the acquisition loop as a sink.
    pub latest: Arc<LatestSample>,
    /// Acquisition status, fed as an event emitter.
    pub status: Arc<StatusTracker>,
    /// SSE broadcaster for real-time events.
    pub sse: Arc<SseBroadcaster>,
    /// Ends open event streams on shutdown.
    pub shutdown: CancellationToken,
}

impl AxumContext {
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            latest: Arc::new(LatestSample::new()),
            status: Arc::new(StatusTracker::new()),
            sse: Arc::new(SseBroadcaster::with_defaults()),
            shutdown,
        }
    }
}

impl std::fmt::Debug for AxumContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxumContext")
            .field("subscribers", &self.sse.subscriber_count())
            .finish_non_exhaustive()
    }
}

/// Bind `config.bind_address()` and serve until `ctx.shutdown` is cancelled.
pub async fn start_server(config: ServerConfig, ctx: AxumContext) -> Result<()> {
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {addr}"))?;
    serve(listener, config, ctx).await
}

/// Serve on an already bound listener until `ctx.shutdown` is cancelled.
pub async fn serve(listener: TcpListener, config: ServerConfig, ctx: AxumContext) -> Result<()> {
    let local: SocketAddr = listener.local_addr()?;
    let shutdown = ctx.shutdown.clone();

    let app = if let Some(ref static_dir) = config.static_dir {
        info!("Serving static assets from: {}", static_dir.display());
        create_spa_router(ctx, static_dir, &config.cors)
    } else {
        create_router(ctx, &config.cors)
    };

    if config.static_dir.is_some() {
        info!("TDS530Logger web server (with UI) listening on http://{local}");
    } else {
        info!("TDS530Logger web server (API only) listening on http://{local}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("Web server stopped");
    Ok(())
}
