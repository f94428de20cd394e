//! Interactive console flow
//!
//! Paste an article (ended by a line reading `END`, or by EOF) to extract its
//! figures, or end it straight away to look up a ticker. Pass
//! `--auto-fallback` to go straight to the ticker prompt when an article
//! carries no figures.

use financial_metrics_extractor::{Config, FinancialAnalyst, FinancialRecord};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Line that ends a pasted article
const ARTICLE_TERMINATOR: &str = "END";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they do not interleave with the tables
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let auto_fallback = std::env::args().any(|arg| arg == "--auto-fallback");

    let config = Config::from_env()?;
    if !config.has_api_key() {
        eprintln!("GEMINI_API_KEY not set in .env; article extraction and analysis are unavailable");
    }

    let analyst = FinancialAnalyst::from_config(&config)?;
    let mut input = BufReader::new(io::stdin()).lines();

    prompt("Paste a financial news article (finish with a line reading END):\n").await?;
    let article = read_article(&mut input).await?;

    if !article.trim().is_empty() {
        info!(article_chars = article.len(), "Extracting from article");

        if let Some(record) = analyst.extract_financial_data(&article).await {
            println!("\nExtracted financial data from article:");
            print_record(&analyst, &record).await;
            return Ok(());
        }

        println!("No financial metrics found in the article.");

        if !auto_fallback && !confirm(&mut input, "Look up live financials by ticker instead? [y/N] ").await? {
            return Ok(());
        }
    }

    prompt("Enter company ticker symbol to fetch live financials: ").await?;
    let ticker = input.next_line().await?.unwrap_or_default();

    if ticker.trim().is_empty() {
        println!("Please enter a ticker symbol.");
        return Ok(());
    }

    let record = analyst.get_live_financials(&ticker).await;
    println!("\nLive financial data from Yahoo Finance:");
    print_record(&analyst, &record).await;

    Ok(())
}

async fn prompt(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}

/// Lines up to the `END` terminator or EOF; blank lines are kept
async fn read_article<R: AsyncBufRead + Unpin>(input: &mut Lines<R>) -> io::Result<String> {
    let mut lines = Vec::new();

    while let Some(line) = input.next_line().await? {
        if line.trim() == ARTICLE_TERMINATOR {
            break;
        }
        lines.push(line);
    }

    Ok(lines.join("\n").trim().to_string())
}

async fn confirm<R: AsyncBufRead + Unpin>(input: &mut Lines<R>, question: &str) -> io::Result<bool> {
    prompt(question).await?;
    let answer = input.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn print_record(analyst: &FinancialAnalyst, record: &FinancialRecord) {
    println!("{}", record);

    if !record.is_complete() {
        return;
    }

    match analyst.generate_insight_for(record).await {
        Some(summary) => println!("Financial Summary:\n{}", summary),
        None => println!("Financial Summary: analysis unavailable."),
    }
}
