use serde::{Deserialize, Serialize};

/// A single position: a ticker and how many shares of it are owned.
///
/// Loaded once from the holdings config file and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingInput {
    /// Ticker symbol as the provider knows it (e.g., "AAPL", "VOO")
    pub ticker: String,

    /// Number of shares owned. Fractional shares are allowed.
    pub shares: f64,
}

impl HoldingInput {
    pub fn new(ticker: impl Into<String>, shares: f64) -> Self {
        Self {
            ticker: ticker.into(),
            shares,
        }
    }
}

/// On-disk shape of the holdings config: `{"stocks": [{"ticker": .., "shares": ..}, ...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoldingsConfig {
    pub stocks: Vec<HoldingInput>,
}
