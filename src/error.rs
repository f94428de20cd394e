//! Error types for the financial metrics extractor

use thiserror::Error;

/// Result type alias for extractor operations
pub type Result<T> = std::result::Result<T, MetricsError>;

#[derive(Error, Debug)]
pub enum MetricsError {

    // =============================
    // Pipeline Errors
    // =============================

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Market data error: {0}")]
    MarketDataError(String),

    #[error("No quote data for symbol {0}")]
    TickerNotFound(String),

    #[error("No JSON object found in model response")]
    NoJsonObject,

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Yahoo Finance error: {0}")]
    YahooError(#[from] finance_query_core::YahooError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
