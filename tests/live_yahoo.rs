use financial_metrics_extractor::live::LiveLookup;
use financial_metrics_extractor::market_data::YahooMarketData;
use financial_metrics_extractor::Config;
use std::sync::Arc;

/// Integration test that hits the live Yahoo Finance API via finance-query-core.
///
/// Requires outbound network access, so it is ignored by default. Run manually
/// with `cargo test -- --ignored fetches_live_apple_financials`.
#[tokio::test]
#[ignore = "requires network access to Yahoo Finance"]
async fn fetches_live_apple_financials() -> Result<(), Box<dyn std::error::Error>> {
    let provider = YahooMarketData::new(&Config::new(""))?;
    let lookup = LiveLookup::new(Arc::new(provider));

    let record = lookup.get_live_financials("aapl").await;
    println!("{}", record);

    assert_eq!(record.stock_symbol, "AAPL");
    assert!(record.company_name.contains("Apple"));
    assert!(record.revenue.starts_with('$') && record.revenue.ends_with('B'));
    assert!(record.eps.starts_with('$'));

    Ok(())
}
