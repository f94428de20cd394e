//! Core data models

use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Measures =================
//

pub const COMPANY_NAME: &str = "Company Name";
pub const STOCK_SYMBOL: &str = "Stock Symbol";
pub const REVENUE: &str = "Revenue";
pub const NET_INCOME: &str = "Net Income";
pub const EPS: &str = "EPS";

/// Record keys in display order
pub const MEASURES: [&str; 5] = [COMPANY_NAME, STOCK_SYMBOL, REVENUE, NET_INCOME, EPS];

//
// ================= Financial Record =================
//

/// Canonical five-field result shared by the text and ticker paths.
///
/// Every value is a display string; an empty string means the measure is
/// unknown. Records are built once per request and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(rename = "Company Name", default)]
    pub company_name: String,
    #[serde(rename = "Stock Symbol", default)]
    pub stock_symbol: String,
    #[serde(rename = "Revenue", default)]
    pub revenue: String,
    #[serde(rename = "Net Income", default)]
    pub net_income: String,
    #[serde(rename = "EPS", default)]
    pub eps: String,
}

impl FinancialRecord {
    pub fn new(
        company_name: impl Into<String>,
        stock_symbol: impl Into<String>,
        revenue: impl Into<String>,
        net_income: impl Into<String>,
        eps: impl Into<String>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            stock_symbol: stock_symbol.into(),
            revenue: revenue.into(),
            net_income: net_income.into(),
            eps: eps.into(),
        }
    }

    /// Record with every value blank
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a value by its display key
    pub fn get(&self, measure: &str) -> Option<&str> {
        match measure {
            COMPANY_NAME => Some(&self.company_name),
            STOCK_SYMBOL => Some(&self.stock_symbol),
            REVENUE => Some(&self.revenue),
            NET_INCOME => Some(&self.net_income),
            EPS => Some(&self.eps),
            _ => None,
        }
    }

    /// `(measure, value)` pairs in display order
    pub fn rows(&self) -> [(&'static str, &str); 5] {
        [
            (COMPANY_NAME, self.company_name.as_str()),
            (STOCK_SYMBOL, self.stock_symbol.as_str()),
            (REVENUE, self.revenue.as_str()),
            (NET_INCOME, self.net_income.as_str()),
            (EPS, self.eps.as_str()),
        ]
    }

    /// True when revenue, net income and EPS are all blank.
    ///
    /// Company name and ticker do not count: the model is asked to name the
    /// ticker from general knowledge, so those two are filled in even for
    /// articles that carry no figures.
    pub fn has_no_metrics(&self) -> bool {
        self.revenue.is_empty() && self.net_income.is_empty() && self.eps.is_empty()
    }

    /// True when every value is blank
    pub fn is_blank(&self) -> bool {
        self.rows().iter().all(|(_, value)| value.is_empty())
    }

    /// Company, revenue, net income and EPS are all present
    pub fn is_complete(&self) -> bool {
        !self.company_name.is_empty()
            && !self.revenue.is_empty()
            && !self.net_income.is_empty()
            && !self.eps.is_empty()
    }
}

impl fmt::Display for FinancialRecord {
    /// Two-column `Measure | Value` table
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let key_width = MEASURES.iter().map(|m| m.len()).max().unwrap_or(0);
        let value_width = rows
            .iter()
            .map(|(_, v)| v.chars().count())
            .max()
            .unwrap_or(0)
            .max("Value".len());

        writeln!(f, "{:<kw$} | {:<vw$}", "Measure", "Value", kw = key_width, vw = value_width)?;
        writeln!(f, "{}-+-{}", "-".repeat(key_width), "-".repeat(value_width))?;
        for (measure, value) in rows {
            writeln!(f, "{:<kw$} | {:<vw$}", measure, value, kw = key_width, vw = value_width)?;
        }
        Ok(())
    }
}
