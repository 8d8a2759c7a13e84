use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::quote::{FetchFailure, QuoteResult, RawQuote};

/// Trait abstraction for market data providers.
///
/// The collector and the runner only ever see this trait, so tests swap in
/// a mock and a different data vendor only needs a new implementation.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the current quote snapshot for one ticker.
    ///
    /// Missing attributes are `None`, not errors. An `Err` means no usable
    /// quote exists at all (network failure, unknown ticker, bad payload).
    async fn get_quote(&self, ticker: &str) -> Result<RawQuote, CoreError>;
}

/// Fetch one ticker and turn any error into a [`FetchFailure`].
///
/// Never fails outward: one bad ticker must not take the run down with it.
pub async fn fetch(provider: &dyn QuoteProvider, ticker: &str) -> QuoteResult {
    provider
        .get_quote(ticker)
        .await
        .map_err(|e| FetchFailure {
            ticker: ticker.to_string(),
            reason: e.to_string(),
        })
}
