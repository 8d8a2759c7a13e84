use clap::Parser;
use std::path::PathBuf;

use portfolio_snapshot_core::models::settings::{DEFAULT_SECTORS_FILE, DEFAULT_STOCKS_FILE};
use portfolio_snapshot_server::{ServerConfig, SnapshotServer, DEFAULT_BIND};

/// Serve the latest portfolio and sector snapshots over HTTP.
#[derive(Debug, Parser)]
#[command(name = "portfolio-server", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_BIND)]
    bind: String,

    /// Holdings snapshot served at /stocks
    #[arg(long, default_value = DEFAULT_STOCKS_FILE)]
    stocks: PathBuf,

    /// Sector snapshot served at /sectors
    #[arg(long, default_value = DEFAULT_SECTORS_FILE)]
    sectors: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let args = Args::parse();
    let config = ServerConfig {
        bind: args.bind,
        stocks_path: args.stocks,
        sectors_path: args.sectors,
    };

    SnapshotServer::with_files(config).run().await?;
    Ok(())
}
