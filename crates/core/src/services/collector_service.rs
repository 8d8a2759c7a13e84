use futures::stream::{self, StreamExt};
use std::sync::Arc;

use crate::models::holding::HoldingInput;
use crate::models::quote::{FetchFailure, QuoteResult};
use crate::providers::traits::{self, QuoteProvider};

/// Number of quote fetches allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Fans a [`QuoteProvider`] out over a list of holdings with bounded concurrency.
///
/// Output slot `i` always belongs to input `i`, whatever order the fetches
/// finish in. Failures are returned in place as `Err(FetchFailure)`; the
/// other fetches are unaffected.
pub struct QuoteCollector {
    provider: Arc<dyn QuoteProvider>,
    concurrency: usize,
}

impl QuoteCollector {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            provider,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Override the pool width. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetch a quote for every holding. Waits for all of them.
    pub async fn collect(&self, holdings: &[HoldingInput]) -> Vec<QuoteResult> {
        let provider = self.provider.as_ref();

        // Completed fetches free their slot immediately, so one slow ticker
        // never holds back the rest of the queue.
        let mut slots: Vec<Option<QuoteResult>> = vec![None; holdings.len()];
        let mut completed = stream::iter(holdings.iter().enumerate())
            .map(|(index, holding)| async move {
                (index, traits::fetch(provider, &holding.ticker).await)
            })
            .buffer_unordered(self.concurrency);
        while let Some((index, result)) = completed.next().await {
            slots[index] = Some(result);
        }

        let results: Vec<QuoteResult> = slots
            .into_iter()
            .zip(holdings)
            .map(|(slot, holding)| {
                slot.unwrap_or_else(|| {
                    Err(FetchFailure {
                        ticker: holding.ticker.clone(),
                        reason: "fetch did not complete".into(),
                    })
                })
            })
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        for failure in results.iter().filter_map(|r| r.as_ref().err()) {
            tracing::warn!(
                provider = provider.name(),
                ticker = %failure.ticker,
                reason = %failure.reason,
                "quote fetch failed"
            );
        }
        tracing::info!(
            provider = provider.name(),
            requested = holdings.len(),
            failed,
            "collected quotes"
        );

        results
    }
}
