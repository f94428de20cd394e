use financial_metrics_extractor::{api::start_server, Config, FinancialAnalyst};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    if !config.has_api_key() {
        warn!("GEMINI_API_KEY not set; extraction and insight requests will report no data");
    }

    info!("Financial Metrics Extractor - API Server");
    info!("Port: {}", config.port);

    let analyst = Arc::new(FinancialAnalyst::from_config(&config)?);

    start_server(analyst, config.port).await?;

    Ok(())
}
