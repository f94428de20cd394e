//! Financial Metrics Extractor
//!
//! Pulls company name, ticker, revenue, net income and EPS out of:
//! - unstructured news text, via a language model
//! - a live market-data provider, by ticker symbol
//!
//! and optionally writes a short narrative analysis of the result.
//!
//! Both data paths produce the same five-field `FinancialRecord`.

pub mod analyst;
pub mod api;
pub mod config;
pub mod error;
pub mod extractor;
pub mod formatting;
pub mod json_extract;
pub mod live;
pub mod llm;
pub mod market_data;
pub mod models;
pub mod summarizer;

pub use error::Result;

// Re-export common types
pub use analyst::FinancialAnalyst;
pub use config::Config;
pub use formatting::{format_eps, format_money};
pub use models::FinancialRecord;
