use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::errors::CoreError;
use crate::models::quote::RawQuote;
use super::traits::QuoteProvider;

const PROVIDER: &str = "Yahoo Finance";

/// `quoteSummary` modules that together hold every attribute we report.
const MODULES: &str = "price,summaryDetail,assetProfile";

/// Yahoo rejects requests from clients that don't look like a browser.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// The three URLs the provider talks to. Overridable so tests can point
/// everything at a local mock server.
#[derive(Debug, Clone)]
pub struct YahooEndpoints {
    /// Any Yahoo page that sets the session cookie (it may answer 404).
    pub cookie_url: String,
    /// Returns the crumb token as plain text.
    pub crumb_url: String,
    /// `quoteSummary` base; the ticker is appended as a path segment.
    pub quote_url: String,
}

impl Default for YahooEndpoints {
    fn default() -> Self {
        Self {
            cookie_url: "https://fc.yahoo.com".into(),
            crumb_url: "https://query1.finance.yahoo.com/v1/test/getcrumb".into(),
            quote_url: "https://query2.finance.yahoo.com/v10/finance/quoteSummary".into(),
        }
    }
}

/// Yahoo Finance quote provider.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities, ETFs, mutual funds.
/// - **Data**: price, name, P/E, market cap, sector/industry, dividends.
///
/// Yahoo's `quoteSummary` endpoint wants a session cookie plus a matching
/// "crumb". Both are obtained on first use and shared by every later request
/// from this provider, so a run costs one handshake plus one call per ticker.
pub struct YahooFinanceProvider {
    client: Client,
    endpoints: YahooEndpoints,
    crumb: OnceCell<String>,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        Self::with_endpoints(YahooEndpoints::default())
    }

    pub fn with_endpoints(endpoints: YahooEndpoints) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            endpoints,
            crumb: OnceCell::new(),
        })
    }

    /// Get the cached crumb, running the cookie/crumb handshake if needed.
    async fn crumb(&self) -> Result<&str, CoreError> {
        self.crumb
            .get_or_try_init(|| self.fetch_crumb())
            .await
            .map(String::as_str)
    }

    async fn fetch_crumb(&self) -> Result<String, CoreError> {
        // Only the Set-Cookie header matters here; the status is usually 404.
        if let Err(e) = self.client.get(&self.endpoints.cookie_url).send().await {
            tracing::debug!(error = %e, "cookie priming request failed");
        }

        let resp = self.client.get(&self.endpoints.crumb_url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        let crumb = body.trim();

        if !status.is_success() || crumb.is_empty() || crumb.contains('<') {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to obtain crumb (HTTP {status})"),
            });
        }

        tracing::debug!("obtained Yahoo crumb");
        Ok(crumb.to_string())
    }

    /// `{quote_url}/{ticker}`, with the ticker escaped as one path segment.
    fn quote_url(&self, ticker: &str) -> Result<reqwest::Url, CoreError> {
        let invalid = |detail: String| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Invalid quote endpoint {}: {detail}", self.endpoints.quote_url),
        };
        let mut url = reqwest::Url::parse(&self.endpoints.quote_url)
            .map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base".into()))?
            .pop_if_empty()
            .push(ticker);
        Ok(url)
    }
}

// ── Yahoo API response types ────────────────────────────────────────

#[derive(Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Deserialize)]
struct QuoteSummary {
    result: Option<Vec<QuoteSummaryResult>>,
    error: Option<YahooError>,
}

#[derive(Deserialize)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct QuoteSummaryResult {
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(rename = "assetProfile")]
    asset_profile: Option<AssetProfileModule>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    regular_market_price: Option<YahooNumber>,
    short_name: Option<String>,
    market_cap: Option<YahooNumber>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetailModule {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<YahooNumber>,
    market_cap: Option<YahooNumber>,
    dividend_yield: Option<YahooNumber>,
    dividend_rate: Option<YahooNumber>,
}

#[derive(Deserialize)]
struct AssetProfileModule {
    sector: Option<String>,
    industry: Option<String>,
}

/// Yahoo wraps numbers as `{"raw": 1.23, "fmt": "1.23"}`; a missing value
/// is an empty object `{}`.
#[derive(Deserialize)]
struct YahooNumber {
    raw: Option<f64>,
}

fn raw(value: Option<YahooNumber>) -> Option<f64> {
    value.and_then(|v| v.raw).filter(|v| v.is_finite())
}

impl QuoteSummaryResult {
    fn into_quote(self, ticker: &str) -> RawQuote {
        let (price, short_name, price_cap) = match self.price {
            Some(p) => (raw(p.regular_market_price), p.short_name, raw(p.market_cap)),
            None => (None, None, None),
        };
        let (pe_ratio, detail_cap, dividend_yield, dividend_rate) = match self.summary_detail {
            Some(d) => (
                raw(d.trailing_pe),
                raw(d.market_cap),
                raw(d.dividend_yield),
                raw(d.dividend_rate),
            ),
            None => (None, None, None, None),
        };
        let (sector, industry) = match self.asset_profile {
            Some(a) => (a.sector, a.industry),
            None => (None, None),
        };

        RawQuote {
            ticker: ticker.to_string(),
            company_name: short_name,
            current_price: price,
            pe_ratio,
            market_cap: detail_cap.or(price_cap),
            sector,
            industry,
            dividend_yield,
            dividend_rate,
        }
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_quote(&self, ticker: &str) -> Result<RawQuote, CoreError> {
        let crumb = self.crumb().await?;
        let url = self.quote_url(ticker)?;

        let resp = self
            .client
            .get(url)
            .query(&[("modules", MODULES), ("crumb", crumb)])
            .send()
            .await?;

        // Unknown tickers come back as 404 with a JSON error body, so parse first.
        let status = resp.status();
        let envelope: QuoteSummaryEnvelope = resp.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse quote for {ticker} (HTTP {status}): {e}"),
        })?;

        if let Some(err) = envelope.quote_summary.error {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!(
                    "{ticker}: {} ({})",
                    err.description.unwrap_or_else(|| "unknown error".into()),
                    err.code.unwrap_or_else(|| status.to_string()),
                ),
            });
        }

        envelope
            .quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .map(|result| result.into_quote(ticker))
            .ok_or_else(|| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("No quote data for {ticker}"),
            })
    }
}
