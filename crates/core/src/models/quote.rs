use serde::{Deserialize, Serialize};

/// Snapshot of market attributes for one ticker at fetch time.
///
/// Every attribute is optional: providers routinely omit fields
/// (ETFs have no sector, many tickers pay no dividend), and that is
/// expected rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    pub ticker: String,
    pub company_name: Option<String>,
    pub current_price: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub market_cap: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub dividend_yield: Option<f64>,
    pub dividend_rate: Option<f64>,
}

impl RawQuote {
    /// A quote carrying only the ticker; fill in the rest with struct update syntax.
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Self::default()
        }
    }
}

/// A fetch that did not produce a quote. The reason is kept for inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub ticker: String,
    pub reason: String,
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.ticker, self.reason)
    }
}

/// Outcome of fetching one ticker. Failures are data, not faults:
/// the collector keeps going and the pipeline drops them later.
pub type QuoteResult = Result<RawQuote, FetchFailure>;
