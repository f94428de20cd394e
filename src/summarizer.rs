//! Narrative analysis of a financial record
//!
//! Uses the language model with two worked examples (one profitable, one
//! loss-making) that set the tone and structure of the reply.

use crate::llm::{GenerationOptions, LanguageModel};
use crate::models::FinancialRecord;
use crate::Result;
use std::sync::Arc;
use tracing::{info, warn};

const WORKED_EXAMPLES: &str = r#"For example,
Given the financials of Apple Inc.:
Revenue: $394.33B
Net Income: $99.80B
EPS: $6.11

Expected response format: Apple Inc. has demonstrated strong financial performance. With a revenue of $394.33 billion and a net income of $99.80 billion, the company maintains a high profit margin, indicating effective cost management. An EPS of $6.11 reflects solid earnings per share, signaling good value generation for investors. These figures point to Apple's continued dominance and financial stability in the tech sector.

For example,
Given the financials of Bed Bath & Beyond Inc.:
Revenue: $5.18B
Net Income: -$1.12B
EPS: -$13.44

Expected response format: Bed Bath & Beyond Inc. is facing significant financial difficulties. The company reported a revenue of $5.18 billion but a net loss of $1.12 billion, indicating severe profitability issues. The negative EPS of -$13.44 reflects substantial losses per share, raising concerns for investors. These figures suggest poor cost control and declining performance, potentially impacting long-term sustainability."#;

pub struct Summarizer {
    model: Arc<dyn LanguageModel>,
}

impl Summarizer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub fn build_prompt(company: &str, revenue: &str, net_income: &str, eps: &str) -> String {
        format!(
            r#"Given the financials of {}:
Revenue: {}
Net Income: {}
EPS: {}

Write a short analysis on the company's financial performance. Avoid made-up numbers.

{}
"#,
            company, revenue, net_income, eps, WORKED_EXAMPLES
        )
    }

    /// Short narrative analysis, or `None` when the analysis is unavailable.
    ///
    /// Inputs are display strings and are embedded verbatim.
    pub async fn generate_insight(
        &self,
        company: &str,
        revenue: &str,
        net_income: &str,
        eps: &str,
    ) -> Option<String> {
        match self.try_generate(company, revenue, net_income, eps).await {
            Ok(summary) if !summary.is_empty() => {
                info!(company, summary_chars = summary.len(), "Generated financial insight");
                Some(summary)
            }
            Ok(_) => {
                warn!(company, "Model returned an empty analysis");
                None
            }
            Err(e) => {
                warn!(company, "Failed to generate financial insight: {}", e);
                None
            }
        }
    }

    pub async fn generate_insight_for(&self, record: &FinancialRecord) -> Option<String> {
        self.generate_insight(
            &record.company_name,
            &record.revenue,
            &record.net_income,
            &record.eps,
        )
        .await
    }

    async fn try_generate(
        &self,
        company: &str,
        revenue: &str,
        net_income: &str,
        eps: &str,
    ) -> Result<String> {
        let prompt = Self::build_prompt(company, revenue, net_income, eps);
        let response = self
            .model
            .generate(&prompt, GenerationOptions::NARRATIVE)
            .await?;

        Ok(response.trim().to_string())
    }
}
