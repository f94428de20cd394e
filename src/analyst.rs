//! Facade over the three collaborator-facing operations
//!
//! The components are independent; sequencing (extract, fall back to a
//! ticker lookup, summarize) is left to the caller.

use crate::config::Config;
use crate::extractor::Extractor;
use crate::live::LiveLookup;
use crate::llm::{GeminiClient, LanguageModel};
use crate::market_data::{MarketDataProvider, YahooMarketData};
use crate::models::FinancialRecord;
use crate::summarizer::Summarizer;
use crate::Result;
use std::sync::Arc;
use tracing::info;

pub struct FinancialAnalyst {
    extractor: Extractor,
    live: LiveLookup,
    summarizer: Summarizer,
}

impl FinancialAnalyst {
    pub fn new(model: Arc<dyn LanguageModel>, market_data: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            extractor: Extractor::new(model.clone()),
            live: LiveLookup::new(market_data),
            summarizer: Summarizer::new(model),
        }
    }

    /// Gemini for text, Yahoo Finance for live data
    pub fn from_config(config: &Config) -> Result<Self> {
        let model = Arc::new(GeminiClient::new(config)?);
        let market_data = Arc::new(YahooMarketData::new(config)?);

        info!(model = %config.gemini_model, "Financial analyst initialized");

        Ok(Self::new(model, market_data))
    }

    pub async fn extract_financial_data(&self, article_text: &str) -> Option<FinancialRecord> {
        self.extractor.extract_financial_data(article_text).await
    }

    pub async fn get_live_financials(&self, ticker: &str) -> FinancialRecord {
        self.live.get_live_financials(ticker).await
    }

    pub async fn generate_insight(
        &self,
        company: &str,
        revenue: &str,
        net_income: &str,
        eps: &str,
    ) -> Option<String> {
        self.summarizer
            .generate_insight(company, revenue, net_income, eps)
            .await
    }

    pub async fn generate_insight_for(&self, record: &FinancialRecord) -> Option<String> {
        self.summarizer.generate_insight_for(record).await
    }
}
