// ═══════════════════════════════════════════════════════════════════
// Provider Tests — Yahoo Finance parsing, crumb handshake, fetch helper
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use mockito::{mock, Matcher, Mock};

use portfolio_snapshot_core::errors::CoreError;
use portfolio_snapshot_core::models::quote::RawQuote;
use portfolio_snapshot_core::providers::traits::{self, QuoteProvider};
use portfolio_snapshot_core::providers::yahoo_finance::{YahooEndpoints, YahooFinanceProvider};

// ═══════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════

/// Each test uses its own path prefix on the shared mockito server.
fn provider(prefix: &str) -> YahooFinanceProvider {
    let base = mockito::server_url();
    YahooFinanceProvider::with_endpoints(YahooEndpoints {
        cookie_url: format!("{base}/{prefix}/cookie"),
        crumb_url: format!("{base}/{prefix}/crumb"),
        quote_url: format!("{base}/{prefix}/quote"),
    })
    .unwrap()
}

fn handshake(prefix: &str) -> (Mock, Mock) {
    let cookie = mock("GET", format!("/{prefix}/cookie").as_str())
        .with_status(404)
        .with_header("set-cookie", "A3=d=test; Path=/")
        .create();
    let crumb = mock("GET", format!("/{prefix}/crumb").as_str())
        .with_status(200)
        .with_body("abc123")
        .create();
    (cookie, crumb)
}

fn quote_mock(prefix: &str, ticker: &str, status: usize, body: &str) -> Mock {
    mock("GET", format!("/{prefix}/quote/{ticker}").as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("modules".into(), "price,summaryDetail,assetProfile".into()),
            Matcher::UrlEncoded("crumb".into(), "abc123".into()),
        ]))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}

const AAPL_BODY: &str = r#"{
  "quoteSummary": {
    "result": [{
      "price": {
        "regularMarketPrice": {"raw": 189.84, "fmt": "189.84"},
        "shortName": "Apple Inc.",
        "marketCap": {"raw": 2950000000000, "fmt": "2.95T"}
      },
      "summaryDetail": {
        "trailingPE": {"raw": 29.41, "fmt": "29.41"},
        "marketCap": {"raw": 2951000000000, "fmt": "2.95T"},
        "dividendYield": {"raw": 0.0052, "fmt": "0.52%"},
        "dividendRate": {"raw": 0.96, "fmt": "0.96"}
      },
      "assetProfile": {
        "sector": "Technology",
        "industry": "Consumer Electronics"
      }
    }],
    "error": null
  }
}"#;

const VOO_BODY: &str = r#"{
  "quoteSummary": {
    "result": [{
      "price": {
        "regularMarketPrice": {"raw": 501.07, "fmt": "501.07"},
        "shortName": "Vanguard S&P 500 ETF",
        "marketCap": {}
      },
      "summaryDetail": {
        "trailingPE": {"raw": 26.1, "fmt": "26.10"},
        "dividendYield": {},
        "dividendRate": {}
      }
    }],
    "error": null
  }
}"#;

const NOT_FOUND_BODY: &str = r#"{
  "quoteSummary": {
    "result": null,
    "error": {"code": "Not Found", "description": "Quote not found for symbol: ZZZZ"}
  }
}"#;

// ═══════════════════════════════════════════════════════════════════
// Yahoo Finance
// ═══════════════════════════════════════════════════════════════════

mod yahoo_finance {
    use super::*;

    #[test]
    fn name() {
        assert_eq!(provider("yf-name").name(), "Yahoo Finance");
    }

    #[tokio::test]
    async fn ticker_escaped_as_single_path_segment() {
        let _h = handshake("yf-escape");
        let _q = quote_mock("yf-escape", "BRK%2FB", 200, AAPL_BODY);

        let quote = provider("yf-escape").get_quote("BRK/B").await.unwrap();
        assert_eq!(quote.ticker, "BRK/B");
        assert_eq!(quote.current_price, Some(189.84));
    }

    #[tokio::test]
    async fn parses_full_quote() {
        let _h = handshake("yf-full");
        let _q = quote_mock("yf-full", "AAPL", 200, AAPL_BODY);

        let quote = provider("yf-full").get_quote("AAPL").await.unwrap();
        assert_eq!(
            quote,
            RawQuote {
                ticker: "AAPL".into(),
                company_name: Some("Apple Inc.".into()),
                current_price: Some(189.84),
                pe_ratio: Some(29.41),
                market_cap: Some(2_951_000_000_000.0),
                sector: Some("Technology".into()),
                industry: Some("Consumer Electronics".into()),
                dividend_yield: Some(0.0052),
                dividend_rate: Some(0.96),
            }
        );
    }

    #[tokio::test]
    async fn missing_fields_are_none() {
        let _h = handshake("yf-etf");
        let _q = quote_mock("yf-etf", "VOO", 200, VOO_BODY);

        let quote = provider("yf-etf").get_quote("VOO").await.unwrap();
        assert_eq!(quote.current_price, Some(501.07));
        assert_eq!(quote.pe_ratio, Some(26.1));
        assert_eq!(quote.market_cap, None);
        assert_eq!(quote.sector, None);
        assert_eq!(quote.industry, None);
        assert_eq!(quote.dividend_yield, None);
        assert_eq!(quote.dividend_rate, None);
    }

    #[tokio::test]
    async fn unknown_ticker_is_api_error() {
        let _h = handshake("yf-404");
        let _q = quote_mock("yf-404", "ZZZZ", 404, NOT_FOUND_BODY);

        match provider("yf-404").get_quote("ZZZZ").await.unwrap_err() {
            CoreError::Api { provider, message } => {
                assert_eq!(provider, "Yahoo Finance");
                assert!(message.contains("Quote not found for symbol: ZZZZ"));
            }
            other => panic!("Expected Api, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_api_error() {
        let _h = handshake("yf-html");
        let _q = quote_mock("yf-html", "AAPL", 500, "<html>oops</html>");

        let err = provider("yf-html").get_quote("AAPL").await.unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn rejected_crumb_fails_the_quote() {
        let _cookie = mock("GET", "/yf-crumb/cookie").with_status(404).create();
        let _crumb = mock("GET", "/yf-crumb/crumb")
            .with_status(401)
            .with_body("<html>Unauthorized</html>")
            .create();

        let err = provider("yf-crumb").get_quote("AAPL").await.unwrap_err();
        match err {
            CoreError::Api { message, .. } => assert!(message.contains("crumb")),
            other => panic!("Expected Api, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn crumb_fetched_once_per_provider() {
        let _cookie = mock("GET", "/yf-once/cookie").with_status(404).create();
        let crumb = mock("GET", "/yf-once/crumb")
            .with_status(200)
            .with_body("abc123")
            .expect(1)
            .create();
        let _a = quote_mock("yf-once", "AAPL", 200, AAPL_BODY);
        let _v = quote_mock("yf-once", "VOO", 200, VOO_BODY);

        let yahoo = provider("yf-once");
        yahoo.get_quote("AAPL").await.unwrap();
        yahoo.get_quote("VOO").await.unwrap();
        crumb.assert();
    }
}

// ═══════════════════════════════════════════════════════════════════
// fetch() helper
// ═══════════════════════════════════════════════════════════════════

struct FailingProvider;

#[async_trait]
impl QuoteProvider for FailingProvider {
    fn name(&self) -> &str {
        "Failing"
    }

    async fn get_quote(&self, ticker: &str) -> Result<RawQuote, CoreError> {
        Err(CoreError::Network(format!("connection refused for {ticker}")))
    }
}

struct StaticProvider;

#[async_trait]
impl QuoteProvider for StaticProvider {
    fn name(&self) -> &str {
        "Static"
    }

    async fn get_quote(&self, ticker: &str) -> Result<RawQuote, CoreError> {
        Ok(RawQuote {
            current_price: Some(1.0),
            ..RawQuote::empty(ticker)
        })
    }
}

mod fetch {
    use super::*;

    #[tokio::test]
    async fn error_becomes_fetch_failure() {
        let failure = traits::fetch(&FailingProvider, "AAPL").await.unwrap_err();
        assert_eq!(failure.ticker, "AAPL");
        assert_eq!(failure.reason, "Network error: connection refused for AAPL");
        assert_eq!(
            failure.to_string(),
            "AAPL: Network error: connection refused for AAPL"
        );
    }

    #[tokio::test]
    async fn success_passes_through() {
        let quote = traits::fetch(&StaticProvider, "MSFT").await.unwrap();
        assert_eq!(quote.ticker, "MSFT");
        assert_eq!(quote.current_price, Some(1.0));
    }
}
