//! Runtime configuration
//!
//! Everything the providers need is carried in one `Config` value that is
//! handed to each component at construction.

use std::env;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub yahoo_proxy: Option<String>,
    pub port: u16,
}

impl Config {
    pub fn new(gemini_api_key: impl Into<String>) -> Self {
        Self {
            gemini_api_key: gemini_api_key.into(),
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            yahoo_proxy: None,
            port: DEFAULT_PORT,
        }
    }

    /// Load configuration from the process environment (after `.env`).
    ///
    /// A missing `GEMINI_API_KEY` is not an error here; the model client
    /// rejects calls made with an empty key.
    pub fn from_env() -> crate::Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::new(env::var("GEMINI_API_KEY").unwrap_or_default());

        if let Some(model) = non_empty_var("GEMINI_MODEL") {
            config.gemini_model = model;
        }
        if let Some(base_url) = non_empty_var("GEMINI_BASE_URL") {
            config.gemini_base_url = base_url;
        }
        config.yahoo_proxy = non_empty_var("YAHOO_PROXY");

        if let Some(port) = non_empty_var("PORT").or_else(|| non_empty_var("API_PORT")) {
            config.port = port.parse().map_err(|_| {
                crate::error::MetricsError::ConfigError(format!("Invalid port: {}", port))
            })?;
        }

        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.gemini_base_url = base_url.into();
        self
    }

    /// Full `generateContent` endpoint for the configured model
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.gemini_base_url.trim_end_matches('/'),
            self.gemini_model
        )
    }

    pub fn has_api_key(&self) -> bool {
        !self.gemini_api_key.trim().is_empty()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
