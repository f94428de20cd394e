//! Financial metric extraction from news text
//!
//! The article is appended to a fixed instruction block and sent to the
//! language model; the reply is scraped for a JSON object and shaped into a
//! `FinancialRecord`.

use crate::json_extract::extract_json_object;
use crate::llm::{GenerationOptions, LanguageModel};
use crate::models::{FinancialRecord, COMPANY_NAME, EPS, MEASURES, NET_INCOME, REVENUE, STOCK_SYMBOL};
use crate::Result;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

const EXTRACTION_INSTRUCTIONS: &str = r#"Please retrieve company name, revenue, net income and earnings per share (a.k.a. EPS)
from the following news article. If you can't find the information from this article
then return "". Do not make things up.
Then retrieve a stock symbol corresponding to that company. For this you can use
your general knowledge (it doesn't have to be from this article). Always return your
response as a valid JSON string. The format of that string should be this:
{
    "Company Name": "Walmart",
    "Stock Symbol": "WMT",
    "Revenue": "12.34 million",
    "Net Income": "34.78 million",
    "EPS": "2.1 $"
}
News Article:
============
"#;

pub struct Extractor {
    model: Arc<dyn LanguageModel>,
}

impl Extractor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Full prompt sent for one article
    pub fn build_prompt(article_text: &str) -> String {
        format!("{}{}", EXTRACTION_INSTRUCTIONS, article_text)
    }

    /// Extract the five measures from an article.
    ///
    /// Returns `None` when the model reply holds no usable JSON object or the
    /// article carries no revenue, net income or EPS figures. Model failures
    /// are logged and reported the same way.
    pub async fn extract_financial_data(&self, article_text: &str) -> Option<FinancialRecord> {
        match self.try_extract(article_text).await {
            Ok(Some(record)) => {
                info!(company = %record.company_name, symbol = %record.stock_symbol, "Extracted financial data");
                Some(record)
            }
            Ok(None) => {
                info!("No financial metrics found in the article");
                None
            }
            Err(e) => {
                warn!("Financial data extraction failed: {}", e);
                None
            }
        }
    }

    async fn try_extract(&self, article_text: &str) -> Result<Option<FinancialRecord>> {
        let prompt = Self::build_prompt(article_text);
        let response = self
            .model
            .generate(&prompt, GenerationOptions::EXTRACTION)
            .await?;

        debug!(response = %response, "Raw model response");

        let object = extract_json_object(&response)?;

        Ok(record_from_json(&object).filter(|record| !record.has_no_metrics()))
    }
}

/// Shape a decoded JSON object into a record.
///
/// Unknown keys are dropped; missing keys become `""`. Returns `None` when
/// the object has none of the five measures.
pub fn record_from_json(object: &Map<String, Value>) -> Option<FinancialRecord> {
    if !MEASURES.iter().any(|measure| object.contains_key(*measure)) {
        return None;
    }

    let field = |key: &str| object.get(key).map(display_value).unwrap_or_default();

    Some(FinancialRecord {
        company_name: field(COMPANY_NAME),
        stock_symbol: field(STOCK_SYMBOL),
        revenue: field(REVENUE),
        net_income: field(NET_INCOME),
        eps: field(EPS),
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
