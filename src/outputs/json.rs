//! JSON output of extracted records.
//!
//! When a JSON output directory is configured, each feed additionally
//! writes `{dir}/{name}.json` containing the feed name, the generation
//! timestamp, and the full record list. Useful for API consumption and for
//! inspecting what extraction produced without reading XML.

use crate::models::ArticleRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
struct FeedDump<'a> {
    feed: &'a str,
    generated_at: DateTime<Utc>,
    articles: &'a [ArticleRecord],
}

/// Write one feed's extracted records as a JSON file.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, feed = %feed_name))]
pub async fn write_records(
    json_output_dir: &str,
    feed_name: &str,
    records: &[ArticleRecord],
) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(json_output_dir).await?;

    let dump = FeedDump {
        feed: feed_name,
        generated_at: Utc::now(),
        articles: records,
    };
    let json = serde_json::to_string_pretty(&dump)?;

    let path = format!(
        "{}/{}.json",
        json_output_dir.trim_end_matches('/'),
        feed_name
    );
    fs::write(&path, json).await?;
    info!(path = %path, articles = records.len(), "Wrote JSON records");

    Ok(())
}
