use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use portfolio_snapshot_core::models::settings::{
    Settings, DEFAULT_HOLDINGS_FILE, DEFAULT_SECTORS_FILE, DEFAULT_STOCKS_FILE,
};
use portfolio_snapshot_core::providers::yahoo_finance::YahooFinanceProvider;
use portfolio_snapshot_core::services::collector_service::DEFAULT_CONCURRENCY;
use portfolio_snapshot_core::SnapshotRunner;

/// Fetch quotes for every holding and write the portfolio and sector snapshots.
#[derive(Debug, Parser)]
#[command(name = "portfolio-aggregate", version, about)]
struct Args {
    /// Holdings config: {"stocks": [{"ticker": "..", "shares": ..}, ...]}
    #[arg(long, default_value = DEFAULT_HOLDINGS_FILE)]
    holdings: PathBuf,

    /// Output file for the ranked holdings table
    #[arg(long, default_value = DEFAULT_STOCKS_FILE)]
    stocks: PathBuf,

    /// Output file for the sector rollup table
    #[arg(long, default_value = DEFAULT_SECTORS_FILE)]
    sectors: PathBuf,

    /// Maximum quote requests in flight
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Self {
            holdings_path: args.holdings,
            stocks_path: args.stocks,
            sectors_path: args.sectors,
            concurrency: args.concurrency,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from(Args::parse());
    let provider = YahooFinanceProvider::new().context("failed to set up quote provider")?;
    let runner = SnapshotRunner::new(settings, Arc::new(provider));

    let summary = runner.run().await.context("aggregation run failed")?;
    if summary.retained == 0 {
        tracing::warn!(requested = summary.requested, "snapshot is empty");
    }
    Ok(())
}
