//! # Feedforge
//!
//! Turns news listing pages into RSS 2.0 feeds. Sites that publish a
//! rendered list of articles but no feed get one generated for them: the
//! listing page is fetched, article title/link/date/summary records are
//! extracted with heuristic CSS-selector probing, deduplicated, and written
//! out as one RSS file per configured source.
//!
//! ## Usage
//!
//! ```sh
//! feedforge -c feeds.yaml -o ./feeds
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Configuration**: Load the YAML feed list, validate every selector
//! 2. **Fetching**: Download each configured listing page (4 in flight)
//! 3. **Extraction**: Probe candidate selectors, dedupe, sort, cap
//! 4. **Output**: Write one RSS 2.0 file per feed, plus optional JSON dumps
//!
//! Feeds are independent: one site failing (network error, markup change
//! that extracts nothing) never blocks the remaining feeds.

use clap::Parser;
use futures::stream::{self, StreamExt};
use scraper::Html;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod dates;
mod extract;
mod fetch;
mod models;
mod outputs;
mod utils;

use cli::Cli;
use config::FeedSpec;
use extract::{ExtractConfig, Seen};

#[tokio::main]
#[instrument]
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
    info!("feedforge starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.config, ?args.output_dir, ?args.feeds, "Parsed CLI arguments");

    // Early check: ensure the feed output dir is writable
    if let Err(e) = utils::ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Load configuration ----
    let feeds_config = config::load_config(&args.config).await?;

    // Select feeds and compile their selectors before any network I/O, so a
    // typo'd selector fails the run instead of one feed mid-flight.
    let mut jobs: Vec<(&FeedSpec, ExtractConfig)> = Vec::new();
    for spec in &feeds_config.feeds {
        if !args.feeds.is_empty() && !args.feeds.iter().any(|name| name == &spec.name) {
            debug!(feed = %spec.name, "Feed not named on the command line; skipping");
            continue;
        }
        let extract_config = spec
            .extract
            .compile()
            .map_err(|e| format!("feed {:?}: {e}", spec.name))?;
        jobs.push((spec, extract_config));
    }
    if jobs.is_empty() {
        warn!("No feeds selected; nothing to do");
        return Ok(());
    }
    info!(count = jobs.len(), "Feeds selected for this run");

    let client = fetch::build_client(args.timeout_secs)?;

    // ---- Process feeds concurrently ----
    const PARALLEL_FEEDS: usize = 4;

    let results: Vec<bool> = stream::iter(jobs.iter())
        .map(|(spec, extract_config)| {
            let client = &client;
            let args = &args;
            async move {
                match process_feed(client, spec, extract_config, args).await {
                    Ok(count) => {
                        info!(feed = %spec.name, items = count, "Feed complete");
                        true
                    }
                    Err(e) => {
                        error!(feed = %spec.name, error = %e, "Feed failed; continuing with remaining feeds");
                        false
                    }
                }
            }
        })
        .buffer_unordered(PARALLEL_FEEDS)
        .collect()
        .await;

    let successful = results.iter().filter(|ok| **ok).count();
    let failed = results.len() - successful;
    let elapsed = start_time.elapsed();
    info!(
        total = results.len(),
        successful,
        failed,
        ?elapsed,
        "Execution complete"
    );

    Ok(())
}

/// Run the full pipeline for one configured feed: fetch the listing page,
/// extract records, and write the RSS file (plus the optional JSON dump).
///
/// Returns the number of records written. An empty extraction writes
/// nothing and leaves any feed file from a previous run untouched.
#[instrument(level = "info", skip_all, fields(feed = %spec.name))]
async fn process_feed(
    client: &reqwest::Client,
    spec: &FeedSpec,
    extract_config: &ExtractConfig,
    args: &Cli,
) -> Result<usize, Box<dyn Error>> {
    let base = spec.base()?;
    let body = fetch::fetch_page(client, &spec.page_url).await?;

    // Parse and extract synchronously; the document never crosses an await.
    let records = {
        let document = Html::parse_document(&body);
        let mut seen = Seen::default();
        extract::extract(&document, &base, extract_config, &mut seen)
    };
    info!(count = records.len(), "Extracted article records");

    if records.is_empty() {
        warn!(
            body_preview = %utils::truncate_for_log(&body, 300),
            "No articles extracted; leaving any existing feed file untouched"
        );
        return Ok(0);
    }

    let mut domains: Vec<String> = records.iter().filter_map(|r| r.source_domain()).collect();
    domains.sort();
    domains.dedup();
    debug!(domains = ?domains, "Link domains in this batch");

    let feed_path = format!(
        "{}/{}",
        args.output_dir.trim_end_matches('/'),
        spec.output_filename()
    );
    outputs::rss::write_channel(&feed_path, &spec.channel, &spec.page_url, &records).await?;

    if let Some(json_dir) = &args.json_output_dir {
        outputs::json::write_records(json_dir, &spec.name, &records).await?;
    }

    Ok(records.len())
}
