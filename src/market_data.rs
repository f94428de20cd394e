//! Market-data provider
//!
//! Yahoo Finance quote summaries via finance-query-core. Only the four
//! fields the live lookup needs are pulled out of the payload.

use crate::config::Config;
use crate::error::MetricsError;
use crate::Result;
use async_trait::async_trait;
use finance_query_core::{FetchClient, YahooAuthManager, YahooFinanceClient};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Quote-summary modules that carry the looked-up fields
pub const SUMMARY_MODULES: [&str; 3] = ["price", "financialData", "defaultKeyStatistics"];

/// Raw company fields as reported by the provider.
///
/// Numeric fields stay as JSON so formatting decides what is convertible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyInfo {
    pub long_name: Option<String>,
    pub total_revenue: Value,
    pub net_income_to_common: Value,
    pub trailing_eps: Value,
}

/// Company profile lookup keyed by ticker
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn company_info(&self, ticker: &str) -> Result<CompanyInfo>;
}

pub struct YahooMarketData {
    client: Arc<YahooFinanceClient>,
}

impl YahooMarketData {
    /// Build a Yahoo client with optional proxy support.
    pub fn new(config: &Config) -> Result<Self> {
        let proxy = config.yahoo_proxy.clone();
        let fetch = Arc::new(FetchClient::new(proxy.clone())?);
        let auth = Arc::new(YahooAuthManager::new(proxy, fetch.cookie_jar().clone()));
        let client = Arc::new(YahooFinanceClient::new(auth, fetch));

        Ok(Self { client })
    }
}

#[async_trait]
impl MarketDataProvider for YahooMarketData {
    async fn company_info(&self, ticker: &str) -> Result<CompanyInfo> {
        info!(ticker, "Fetching Yahoo quote summary");

        let summary = self.client.get_quote_summary(ticker, &SUMMARY_MODULES).await?;

        company_info_from_summary(ticker, &summary)
    }
}

/// Pull the looked-up fields out of a raw `quoteSummary` payload
pub fn company_info_from_summary(ticker: &str, summary: &Value) -> Result<CompanyInfo> {
    let result = summary
        .get("quoteSummary")
        .and_then(|q| q.get("result"))
        .and_then(|r| r.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| MetricsError::TickerNotFound(ticker.to_string()))?;

    if !result.is_object() {
        return Err(MetricsError::MarketDataError(format!(
            "Malformed quote summary for {}",
            ticker
        )));
    }

    let long_name = result
        .get("price")
        .and_then(|p| p.get("longName"))
        .and_then(|n| n.as_str())
        .map(|s| s.to_string());

    Ok(CompanyInfo {
        long_name,
        total_revenue: module_field(result, "totalRevenue"),
        net_income_to_common: module_field(result, "netIncomeToCommon"),
        trailing_eps: module_field(result, "trailingEps"),
    })
}

/// First occurrence of `field` across the summary modules
fn module_field(result: &Value, field: &str) -> Value {
    SUMMARY_MODULES
        .iter()
        .filter_map(|module| result.get(*module))
        .find_map(|module| module.get(field))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Canned market data for development & testing
pub struct StaticMarketData {
    summary: std::result::Result<Value, String>,
}

impl StaticMarketData {
    /// Serve the given raw `quoteSummary` payload for every ticker
    pub fn with_summary(summary: Value) -> Self {
        Self {
            summary: Ok(summary),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            summary: Err(message.into()),
        }
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketData {
    async fn company_info(&self, ticker: &str) -> Result<CompanyInfo> {
        match &self.summary {
            Ok(summary) => company_info_from_summary(ticker, summary),
            Err(message) => Err(MetricsError::MarketDataError(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apple_summary() -> Value {
        json!({
            "quoteSummary": {
                "result": [{
                    "price": { "longName": "Apple Inc.", "shortName": "Apple" },
                    "financialData": {
                        "totalRevenue": { "raw": 394_328_000_000_i64, "fmt": "394.33B" }
                    },
                    "defaultKeyStatistics": {
                        "netIncomeToCommon": { "raw": 99_803_000_000_i64, "fmt": "99.8B" },
                        "trailingEps": { "raw": 6.11, "fmt": "6.11" }
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn test_company_info_from_summary() {
        let info = company_info_from_summary("AAPL", &apple_summary()).unwrap();

        assert_eq!(info.long_name.as_deref(), Some("Apple Inc."));
        assert_eq!(info.total_revenue["raw"], 394_328_000_000_i64);
        assert_eq!(info.net_income_to_common["raw"], 99_803_000_000_i64);
        assert_eq!(info.trailing_eps["raw"], 6.11);
    }

    #[test]
    fn test_missing_fields_default_to_null() {
        let summary = json!({
            "quoteSummary": { "result": [{ "price": { "shortName": "Tiny Co" } }] }
        });
        let info = company_info_from_summary("TINY", &summary).unwrap();

        // only longName counts as the company name
        assert_eq!(info.long_name, None);
        assert_eq!(info.total_revenue, Value::Null);
        assert_eq!(info.net_income_to_common, Value::Null);
        assert_eq!(info.trailing_eps, Value::Null);
    }

    #[test]
    fn test_empty_result_is_ticker_not_found() {
        let summary = json!({ "quoteSummary": { "result": [], "error": null } });
        assert!(matches!(
            company_info_from_summary("ZZZZ", &summary),
            Err(MetricsError::TickerNotFound(t)) if t == "ZZZZ"
        ));
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticMarketData::with_summary(apple_summary());
        let info = provider.company_info("AAPL").await.unwrap();
        assert_eq!(info.long_name.as_deref(), Some("Apple Inc."));

        let failing = StaticMarketData::failing("connection reset");
        assert!(failing.company_info("AAPL").await.is_err());
    }
}
