pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use models::{holding::HoldingInput, record::Snapshot, settings::Settings};
use providers::traits::QuoteProvider;
use services::{aggregation_service::AggregationService, collector_service::QuoteCollector};
use std::sync::Arc;
use storage::manager::SnapshotStore;

use errors::CoreError;

/// What one aggregation run did, for logging and exit reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Holdings listed in the config
    pub requested: usize,
    /// Holdings that made it into the snapshot
    pub retained: usize,
    /// Holdings whose fetch failed outright
    pub failed: usize,
    /// Rows in the sector table
    pub sectors: usize,
    /// Sum of retained holding values
    pub total_value: f64,
}

/// Main entry point for the portfolio-snapshot core library.
///
/// Wires the holdings config, the quote collector, the aggregation
/// pipeline and the snapshot files together. One `run()` is one snapshot.
#[must_use]
pub struct SnapshotRunner {
    settings: Settings,
    collector: QuoteCollector,
    aggregation_service: AggregationService,
    store: SnapshotStore,
}

impl std::fmt::Debug for SnapshotRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotRunner")
            .field("settings", &self.settings)
            .field("concurrency", &self.collector.concurrency())
            .finish()
    }
}

impl SnapshotRunner {
    pub fn new(settings: Settings, provider: Arc<dyn QuoteProvider>) -> Self {
        let collector = QuoteCollector::new(provider).with_concurrency(settings.concurrency);
        let store = SnapshotStore::from_settings(&settings);
        Self {
            settings,
            collector,
            aggregation_service: AggregationService::new(),
            store,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load holdings → fetch quotes → aggregate → overwrite both snapshot files.
    ///
    /// Per-ticker failures never abort the run; only config and snapshot
    /// file errors are returned.
    pub async fn run(&self) -> Result<RunSummary, CoreError> {
        let holdings = storage::config::load_holdings(&self.settings.holdings_path)?;
        let (snapshot, failed) = self.build_snapshot(&holdings).await;
        self.store.save(&snapshot)?;

        let summary = RunSummary {
            requested: holdings.len(),
            retained: snapshot.holdings.len(),
            failed,
            sectors: snapshot.sectors.len(),
            total_value: snapshot.total_value(),
        };
        tracing::info!(
            requested = summary.requested,
            retained = summary.retained,
            failed = summary.failed,
            sectors = summary.sectors,
            total_value = summary.total_value,
            stocks = %self.store.stocks_path().display(),
            sectors_file = %self.store.sectors_path().display(),
            "snapshot written"
        );
        Ok(summary)
    }

    /// Fetch and aggregate without touching the filesystem.
    /// Returns the snapshot and the number of failed fetches.
    pub async fn build_snapshot(&self, holdings: &[HoldingInput]) -> (Snapshot, usize) {
        let results = self.collector.collect(holdings).await;
        let failed = results.iter().filter(|r| r.is_err()).count();
        let snapshot = self.aggregation_service.aggregate(holdings, results);
        (snapshot, failed)
    }
}
