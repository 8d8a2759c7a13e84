use std::path::PathBuf;

use crate::services::collector_service::DEFAULT_CONCURRENCY;

/// Default holdings config file name.
pub const DEFAULT_HOLDINGS_FILE: &str = "stocks.json";
/// Default per-holding snapshot file name.
pub const DEFAULT_STOCKS_FILE: &str = "stock_data.json";
/// Default per-sector snapshot file name.
pub const DEFAULT_SECTORS_FILE: &str = "sector_data.json";

/// Where one aggregation run reads its input and writes its output.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Holdings config (`{"stocks": [...]}`)
    pub holdings_path: PathBuf,

    /// Ranked holdings snapshot, overwritten each run
    pub stocks_path: PathBuf,

    /// Ranked sector snapshot, overwritten each run
    pub sectors_path: PathBuf,

    /// Maximum number of quote fetches in flight
    pub concurrency: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            holdings_path: PathBuf::from(DEFAULT_HOLDINGS_FILE),
            stocks_path: PathBuf::from(DEFAULT_STOCKS_FILE),
            sectors_path: PathBuf::from(DEFAULT_SECTORS_FILE),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}
