//! Live financials by ticker

use crate::formatting::{format_eps, format_money};
use crate::market_data::{CompanyInfo, MarketDataProvider};
use crate::models::FinancialRecord;
use std::sync::Arc;
use tracing::{error, info};

pub struct LiveLookup {
    provider: Arc<dyn MarketDataProvider>,
}

impl LiveLookup {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Fetch and format live financials for `ticker`.
    ///
    /// Never fails: provider errors are logged and yield a record whose
    /// values are all empty.
    pub async fn get_live_financials(&self, ticker: &str) -> FinancialRecord {
        let symbol = ticker.trim().to_uppercase();

        if symbol.is_empty() {
            error!("Live lookup requested without a ticker symbol");
            return FinancialRecord::empty();
        }

        match self.provider.company_info(&symbol).await {
            Ok(info) => {
                let record = record_from_company_info(&symbol, &info);
                info!(symbol = %symbol, company = %record.company_name, "Live financials fetched");
                record
            }
            Err(e) => {
                error!(symbol = %symbol, "Error fetching live financials: {}", e);
                FinancialRecord::empty()
            }
        }
    }
}

/// Format provider fields into the canonical record
pub fn record_from_company_info(symbol: &str, info: &CompanyInfo) -> FinancialRecord {
    FinancialRecord {
        company_name: info.long_name.clone().unwrap_or_default(),
        stock_symbol: symbol.to_uppercase(),
        revenue: format_money(&info.total_revenue),
        net_income: format_money(&info.net_income_to_common),
        eps: format_eps(&info.trailing_eps),
    }
}
