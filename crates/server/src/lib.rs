pub mod handlers;
pub mod source;

use axum::{routing::get, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use portfolio_snapshot_core::models::settings::{DEFAULT_SECTORS_FILE, DEFAULT_STOCKS_FILE};

use handlers::{get_sectors, get_stocks, health_check};
use source::{FileSnapshotSource, SnapshotSource};

/// Flask's default address, kept so existing clients need no change.
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub stocks_path: PathBuf,
    pub sectors_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            stocks_path: PathBuf::from(DEFAULT_STOCKS_FILE),
            sectors_path: PathBuf::from(DEFAULT_SECTORS_FILE),
        }
    }
}

/// Shared handler state. Immutable after construction.
#[derive(Clone)]
pub struct AppState {
    pub stocks_path: PathBuf,
    pub sectors_path: PathBuf,
    pub source: Arc<dyn SnapshotSource>,
}

/// Snapshot server: two read-only JSON routes plus a health check.
pub struct SnapshotServer {
    config: ServerConfig,
    state: AppState,
}

impl SnapshotServer {
    pub fn new(config: ServerConfig, source: Arc<dyn SnapshotSource>) -> Self {
        let state = AppState {
            stocks_path: config.stocks_path.clone(),
            sectors_path: config.sectors_path.clone(),
            source,
        };
        Self { config, state }
    }

    /// Server reading snapshot files straight from disk.
    pub fn with_files(config: ServerConfig) -> Self {
        Self::new(config, Arc::new(FileSnapshotSource))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/stocks", get(get_stocks))
            .route("/sectors", get(get_sectors))
            .route("/health", get(health_check))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind and serve until the process is terminated.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(&self.config.bind).await?;
        tracing::info!("Snapshot server listening on http://{}", self.config.bind);
        tracing::info!("  - Stocks: http://{}/stocks", self.config.bind);
        tracing::info!("  - Sectors: http://{}/sectors", self.config.bind);
        axum::serve(listener, self.router()).await
    }
}
