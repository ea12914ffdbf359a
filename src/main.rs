//! # Pulse News
//!
//! A news collection pipeline that searches Google News for user topics,
//! deduplicates the returned headlines, retrieves each article's full text,
//! and writes the results as dated JSON editions.
//!
//! ## Features
//!
//! - Per-topic candidate search over the Google News RSS feed
//! - Near-duplicate headline suppression within each topic, plus a global
//!   exact-title pass across topics
//! - Full-text retrieval from static HTML pages and linked PDFs, with
//!   bounded retries and exponential backoff
//! - Optional headless-browser resolution of client-rendered aggregator
//!   links (`--rendered`)
//!
//! ## Usage
//!
//! ```sh
//! pulse_news -t "Ukraine" -t "Defense spending" -o ./output
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Searching**: Query the news index once per topic
//! 2. **Filtering**: Suppress duplicate headlines per topic, then globally
//! 3. **Fetching**: Download article text (parallel static fetches, or a
//!    single serialized browser session for rendered pages)
//! 4. **Output**: Write the dated JSON results file

use clap::Parser;
use futures::stream::{self, StreamExt};
use std::error::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod browser;
mod cli;
mod collector;
mod config;
mod dedup;
mod extract;
mod fetch;
mod index;
mod models;
mod normalize;
mod outputs;
mod retry;
mod utils;

use browser::RenderedFetcher;
use chrono::Local;
use cli::Cli;
use collector::ArticleCollector;
use config::AppConfig;
use fetch::DocumentFetcher;
use index::GoogleNewsClient;
use models::{Article, ResultSet};
use outputs::json;
use utils::{ensure_writable_dir, time_of_day, truncate_for_log};

/// Concurrent static fetches in flight at once.
const PARALLEL_FETCHES: usize = 12;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("pulse_news starting up");

    // Parse CLI and resolve configuration
    let args = Cli::parse();
    debug!(?args.topics, ?args.output_dir, args.rendered, "Parsed CLI arguments");

    let mut config = match args.config.as_deref() {
        Some(path) => {
            let loaded = config::load_config(path).await?;
            info!(config_path = path, "Loaded configuration");
            loaded
        }
        None => AppConfig::default(),
    };
    if !args.topics.is_empty() {
        config.topics = args.topics.clone();
    }
    if let Some(threshold) = args.fuzzy_threshold {
        config.fuzzy_threshold = threshold;
    }
    if config.topics.is_empty() {
        return Err("no topics given; pass --topic or a config file with a topics list".into());
    }

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        tracing::error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Collect article metadata per topic ----
    let news_index = GoogleNewsClient::new(&config)?;
    let collector = ArticleCollector::new(news_index, config.fuzzy_threshold);
    let mut articles = collector.collect(&config.topics).await;

    if articles.is_empty() {
        warn!("No articles found matching the search criteria");
        return Ok(());
    }
    info!(count = articles.len(), "Collected articles across all topics");

    // ---- Fetch article bodies ----
    if args.skip_bodies {
        info!("Skipping body fetching (--skip-bodies)");
    } else {
        let fetcher = DocumentFetcher::new()?;
        if args.rendered {
            fetch_rendered(&mut articles, &fetcher).await?;
        } else {
            fetch_static(&mut articles, &fetcher).await;
        }
    }

    // ---- Write results ----
    let results = ResultSet {
        local_date: Local::now().date_naive().to_string(),
        time_of_day: time_of_day(),
        local_time: Local::now().time().to_string(),
        articles,
    };

    if let Err(e) = json::write_results(&results, &args.output_dir).await {
        tracing::error!(error = %e, "Failed to write JSON results");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        articles = results.articles.len(),
        "Execution complete"
    );

    Ok(())
}

/// Fetch bodies over plain HTTP, several documents in flight at once.
async fn fetch_static(articles: &mut [Article], fetcher: &DocumentFetcher) {
    let total = articles.len();
    info!(total, parallel = PARALLEL_FETCHES, "Fetching article bodies (static)");

    let bodies: Vec<(usize, String)> = stream::iter(articles.iter().enumerate())
        .map(|(i, article)| async move {
            let outcome = fetcher.get_document_text(&article.url).await;
            if !outcome.is_text() {
                warn!(index = i, url = %article.url, "Fetch produced no article text");
            }
            let body = outcome.into_body();
            debug!(index = i, preview = %truncate_for_log(&body, 120), "Fetched body");
            (i, body)
        })
        .buffer_unordered(PARALLEL_FETCHES)
        .collect()
        .await;

    for (i, body) in bodies {
        articles[i].body = Some(body);
    }
    info!(total, "Fetched article bodies");
}

/// Resolve aggregator links one at a time through a single browser session.
///
/// The session handles one navigation at a time, so rendered fetches are
/// strictly sequential. The session is opened here and closed before
/// returning, even when individual fetches fail.
async fn fetch_rendered(
    articles: &mut [Article],
    fetcher: &DocumentFetcher,
) -> Result<(), Box<dyn Error>> {
    let total = articles.len();
    info!(total, "Fetching article bodies (rendered)");

    let mut session = RenderedFetcher::launch().await?;
    for (i, article) in articles.iter_mut().enumerate() {
        let outcome = session.get_document_text(&article.url, fetcher).await;
        if !outcome.is_text() {
            warn!(index = i, url = %article.url, "Rendered fetch produced no article text");
        }
        let body = outcome.into_body();
        debug!(index = i, preview = %truncate_for_log(&body, 120), "Fetched body");
        article.body = Some(body);
    }
    session.close().await;

    info!(total, "Fetched article bodies");
    Ok(())
}
