//! Trend Scout — Binary Entrypoint
//! Runs the trend-discovery pipeline once: GitHub + arXiv search per keyword,
//! recency filtering, LLM summarization, batched Supabase inserts.

use std::time::Duration;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trend_scout::config::Settings;
use trend_scout::pipeline::{self, PipelineCfg};
use trend_scout::sources::{arxiv::ArxivSource, github::GithubSource, TrendSource};
use trend_scout::store::SupabaseWriter;
use trend_scout::summarize::GeminiSummarizer;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trend_scout=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Configuration errors are the only fatal ones; everything past this
    // point is converted to a skip, an empty batch, or a sentinel claim.
    let settings = Settings::from_env()?;

    // One HTTP client for the whole run: bounded keep-alive pool, fixed
    // timeouts. The driver never has more than one request in flight.
    let http = reqwest::Client::builder()
        .pool_max_idle_per_host(5)
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .build()?;

    let sources: Vec<Box<dyn TrendSource>> = vec![
        Box::new(GithubSource::new(http.clone())),
        Box::new(ArxivSource::new(http.clone(), settings.max_results)),
    ];
    let summarizer = GeminiSummarizer::new(http.clone(), settings.google_api_key.clone(), None);
    let writer = SupabaseWriter::new(http, settings.supabase_url.clone(), settings.supabase_key.clone());

    let cfg = PipelineCfg {
        keywords: settings.keywords.clone(),
        lookback: chrono::Duration::days(settings.lookback_days),
        keyword_delay: Duration::from_secs(settings.keyword_delay_secs),
    };

    let stats = pipeline::run(&sources, &summarizer, &writer, &cfg).await;
    tracing::info!(
        items = stats.items,
        written = stats.written,
        skipped_empty = stats.skipped_empty,
        skipped_stale = stats.skipped_stale,
        skipped_malformed = stats.skipped_malformed,
        source_errors = stats.source_errors,
        "scout run complete"
    );

    Ok(())
}
