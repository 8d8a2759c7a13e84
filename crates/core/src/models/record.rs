use serde::{Deserialize, Serialize};

use super::holding::HoldingInput;
use super::quote::{QuoteResult, RawQuote};

/// One row of the holdings snapshot.
///
/// Field names on disk are the column names `stock_data.json` has always
/// used, so existing consumers of the file keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    #[serde(rename = "Ticker")]
    pub ticker: String,

    #[serde(rename = "Shares Owned")]
    pub shares_owned: f64,

    #[serde(rename = "Company Name")]
    pub company_name: Option<String>,

    #[serde(rename = "Current Price")]
    pub current_price: Option<f64>,

    /// `current_price * shares_owned`, absent when there is no price
    #[serde(rename = "Total Value")]
    pub total_value: Option<f64>,

    #[serde(rename = "P/E Ratio")]
    pub pe_ratio: Option<f64>,

    #[serde(rename = "Market Cap")]
    pub market_cap: Option<f64>,

    /// Normalized: never absent once the record has gone through the pipeline
    #[serde(rename = "Sector")]
    pub sector: Option<String>,

    #[serde(rename = "Industry")]
    pub industry: Option<String>,

    #[serde(rename = "Dividend Yield")]
    pub dividend_yield: Option<f64>,

    #[serde(rename = "Dividend Rate")]
    pub dividend_rate: Option<f64>,

    #[serde(rename = "Percentage of Portfolio")]
    pub percent_of_portfolio: Option<f64>,

    /// Set only when the fetch failed; such records never reach a snapshot.
    #[serde(
        rename = "Error",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
}

impl HoldingRecord {
    /// Join a fetched quote with the shares owned and value the position.
    pub fn from_quote(quote: RawQuote, shares_owned: f64) -> Self {
        let total_value = quote.current_price.map(|price| price * shares_owned);
        Self {
            ticker: quote.ticker,
            shares_owned,
            company_name: quote.company_name,
            current_price: quote.current_price,
            total_value,
            pe_ratio: quote.pe_ratio,
            market_cap: quote.market_cap,
            sector: quote.sector,
            industry: quote.industry,
            dividend_yield: quote.dividend_yield,
            dividend_rate: quote.dividend_rate,
            percent_of_portfolio: None,
            error: None,
        }
    }

    /// A record for a ticker whose fetch failed. It has no value.
    pub fn failed(ticker: impl Into<String>, shares_owned: f64, reason: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            shares_owned,
            company_name: None,
            current_price: None,
            total_value: None,
            pe_ratio: None,
            market_cap: None,
            sector: None,
            industry: None,
            dividend_yield: None,
            dividend_rate: None,
            percent_of_portfolio: None,
            error: Some(reason.into()),
        }
    }

    /// Build the record for one (holding, fetch outcome) pair.
    pub fn from_result(holding: &HoldingInput, result: QuoteResult) -> Self {
        match result {
            Ok(quote) => Self::from_quote(quote, holding.shares),
            Err(failure) => Self::failed(failure.ticker, holding.shares, failure.reason),
        }
    }
}

/// One row of the sector snapshot (`sector_data.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRecord {
    #[serde(rename = "Sector")]
    pub sector: String,

    #[serde(rename = "Total Value")]
    pub total_value: f64,

    #[serde(rename = "Percentage of Portfolio")]
    pub percent_of_portfolio: f64,
}

impl SectorRecord {
    pub fn new(sector: impl Into<String>, total_value: f64) -> Self {
        Self {
            sector: sector.into(),
            total_value,
            percent_of_portfolio: 0.0,
        }
    }
}

/// Output of one aggregation run: both tables, ranked and annotated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub holdings: Vec<HoldingRecord>,
    pub sectors: Vec<SectorRecord>,
}

impl Snapshot {
    /// Sum of the retained holdings' values.
    pub fn total_value(&self) -> f64 {
        self.holdings.iter().filter_map(|h| h.total_value).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}
