use std::fs;
use std::path::Path;

use crate::errors::CoreError;
use crate::models::holding::{HoldingInput, HoldingsConfig};

/// Load the holdings list from a `{"stocks": [...]}` file.
///
/// A holding that fails validation is logged and skipped; the rest of the
/// list still loads. Only an unreadable or malformed file is an error.
pub fn load_holdings(path: &Path) -> Result<Vec<HoldingInput>, CoreError> {
    let bytes = fs::read(path)
        .map_err(|e| CoreError::FileIO(format!("{}: {e}", path.display())))?;
    let config: HoldingsConfig = serde_json::from_slice(&bytes).map_err(|e| {
        CoreError::Deserialization(format!("Invalid holdings file {}: {e}", path.display()))
    })?;

    let holdings: Vec<HoldingInput> = config
        .stocks
        .into_iter()
        .filter(|holding| match validate_holding(holding) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping holding");
                false
            }
        })
        .collect();

    tracing::debug!(path = %path.display(), holdings = holdings.len(), "loaded holdings");
    Ok(holdings)
}

/// Rules:
/// - Ticker must not be blank
/// - Share count must be finite and non-negative
fn validate_holding(holding: &HoldingInput) -> Result<(), CoreError> {
    if holding.ticker.trim().is_empty() {
        return Err(CoreError::ValidationError("Ticker must not be empty".into()));
    }
    if !holding.shares.is_finite() || holding.shares < 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Invalid share count for {}: {}",
            holding.ticker, holding.shares
        )));
    }
    Ok(())
}
