//! YAML feed configuration.
//!
//! One configuration file drives the whole run: each entry under `feeds`
//! names a listing page, the RSS channel metadata to emit, and extraction
//! hints. Every extraction knob is optional and defaulted, so a minimal
//! feed is just a name, a page URL, and channel text:
//!
//! ```yaml
//! feeds:
//!   - name: example
//!     page_url: https://example.com/news/
//!     channel:
//!       title: Example News
//!       description: Articles from the example.com newsroom
//! ```
//!
//! Selector strings are compiled and validated with [`ExtractSpec::compile`]
//! before any page is fetched; a typo'd selector fails the run up front
//! instead of silently matching nothing.

use crate::extract::{DedupeKey, ExtractConfig};
use scraper::Selector;
use serde::Deserialize;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Top-level configuration: the list of feeds to generate.
#[derive(Debug, Deserialize)]
pub struct FeedsConfig {
    pub feeds: Vec<FeedSpec>,
}

/// Configuration for a single feed.
#[derive(Debug, Deserialize)]
pub struct FeedSpec {
    /// Short identifier, used for the default output filename and logging.
    pub name: String,
    /// The listing page to fetch.
    pub page_url: String,
    /// Base for resolving relative links; defaults to `page_url`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Feed filename within the output directory; defaults to `{name}_feed.xml`.
    #[serde(default)]
    pub output_file: Option<String>,
    /// RSS channel metadata.
    pub channel: ChannelMeta,
    /// Extraction hints; every field has a default.
    #[serde(default)]
    pub extract: ExtractSpec,
}

impl FeedSpec {
    pub fn output_filename(&self) -> String {
        self.output_file
            .clone()
            .unwrap_or_else(|| format!("{}_feed.xml", self.name))
    }

    /// URL that relative links resolve against.
    pub fn base(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.base_url.as_deref().unwrap_or(&self.page_url))
    }
}

/// Channel-level RSS metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelMeta {
    pub title: String,
    pub description: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

/// Raw extraction hints as they appear in the configuration file.
///
/// Compiled into an [`ExtractConfig`] (with parsed selectors and lowercased
/// denylist fragments) before use. The default selector lists cover the
/// markup conventions news listings actually use: semantic `<article>`
/// elements, WordPress-style `post`/`article` class names, heading tags for
/// titles, and `date`/`time` classed nodes for timestamps.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractSpec {
    pub container_selectors: Vec<String>,
    pub title_selectors: Vec<String>,
    pub date_selectors: Vec<String>,
    pub summary_selectors: Vec<String>,
    pub min_title_len: usize,
    pub max_title_len: usize,
    pub min_summary_len: usize,
    pub max_summary_len: usize,
    pub scan_cap: usize,
    pub max_items: usize,
    pub dedupe_key: DedupeKey,
    pub deny_paths: Vec<String>,
}

impl Default for ExtractSpec {
    fn default() -> Self {
        Self {
            container_selectors: to_strings(&[
                "article",
                ".post",
                ".article",
                ".news-item",
                r#"[class*="article"]"#,
                r#"[class*="post"]"#,
            ]),
            title_selectors: to_strings(&["h2", "h3", "h1", ".title", r#"[class*="title"]"#]),
            date_selectors: to_strings(&[
                ".date",
                ".published",
                "time",
                r#"[class*="date"]"#,
                r#"[class*="time"]"#,
            ]),
            summary_selectors: to_strings(&[
                ".excerpt",
                ".description",
                "p",
                r#"[class*="excerpt"]"#,
            ]),
            min_title_len: 10,
            max_title_len: 300,
            min_summary_len: 20,
            max_summary_len: 300,
            scan_cap: 50,
            max_items: 30,
            dedupe_key: DedupeKey::Url,
            deny_paths: Vec::new(),
        }
    }
}

impl ExtractSpec {
    /// Compile the raw selector strings, failing on the first invalid one.
    pub fn compile(&self) -> Result<ExtractConfig, Box<dyn Error>> {
        Ok(ExtractConfig {
            containers: compile_selectors(&self.container_selectors)?,
            titles: compile_selectors(&self.title_selectors)?,
            dates: compile_selectors(&self.date_selectors)?,
            summaries: compile_selectors(&self.summary_selectors)?,
            min_title_len: self.min_title_len,
            max_title_len: self.max_title_len,
            min_summary_len: self.min_summary_len,
            max_summary_len: self.max_summary_len,
            scan_cap: self.scan_cap,
            max_items: self.max_items,
            dedupe_key: self.dedupe_key,
            deny_paths: self.deny_paths.iter().map(|f| f.to_lowercase()).collect(),
        })
    }
}

fn compile_selectors(raw: &[String]) -> Result<Vec<Selector>, Box<dyn Error>> {
    raw.iter()
        .map(|s| Selector::parse(s).map_err(|e| format!("invalid selector {s:?}: {e}").into()))
        .collect()
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Load and parse the feed configuration file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn load_config(path: &str) -> Result<FeedsConfig, Box<dyn Error>> {
    let raw = fs::read_to_string(path).await?;
    let config: FeedsConfig = serde_yaml::from_str(&raw)?;
    if config.feeds.is_empty() {
        return Err("configuration lists no feeds".into());
    }
    info!(feeds = config.feeds.len(), "Parsed feed configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
feeds:
  - name: example
    page_url: https://example.com/news/
    channel:
      title: Example News
      description: Articles from the example.com newsroom
"#;

    #[test]
    fn test_minimal_feed_gets_defaults() {
        let config: FeedsConfig = serde_yaml::from_str(MINIMAL).unwrap();
        let feed = &config.feeds[0];
        assert_eq!(feed.name, "example");
        assert_eq!(feed.channel.language, "en");
        assert_eq!(feed.output_filename(), "example_feed.xml");
        assert_eq!(feed.base().unwrap().as_str(), "https://example.com/news/");
        assert_eq!(feed.extract.min_title_len, 10);
        assert_eq!(feed.extract.max_items, 30);
        assert_eq!(feed.extract.dedupe_key, DedupeKey::Url);
        assert!(feed.extract.deny_paths.is_empty());
    }

    #[test]
    fn test_full_feed_overrides() {
        let yaml = r#"
feeds:
  - name: wire
    page_url: https://example.com/wire/
    base_url: https://example.com
    output_file: wire.xml
    channel:
      title: Wire
      description: Aggregated links
      language: de
    extract:
      container_selectors: ["li.entry"]
      dedupe_key: url_and_title
      deny_paths: ["/About/", "/contact"]
      max_items: 10
"#;
        let config: FeedsConfig = serde_yaml::from_str(yaml).unwrap();
        let feed = &config.feeds[0];
        assert_eq!(feed.output_filename(), "wire.xml");
        assert_eq!(feed.base().unwrap().as_str(), "https://example.com/");
        assert_eq!(feed.channel.language, "de");
        assert_eq!(feed.extract.dedupe_key, DedupeKey::UrlAndTitle);
        assert_eq!(feed.extract.max_items, 10);
        // Unspecified knobs keep their defaults.
        assert_eq!(feed.extract.min_title_len, 10);

        let compiled = feed.extract.compile().unwrap();
        assert_eq!(compiled.deny_paths, vec!["/about/", "/contact"]);
        assert_eq!(compiled.containers.len(), 1);
    }

    #[test]
    fn test_default_selectors_compile() {
        assert!(ExtractSpec::default().compile().is_ok());
    }

    #[test]
    fn test_invalid_selector_names_the_offender() {
        let spec = ExtractSpec {
            container_selectors: vec!["[[[".to_string()],
            ..ExtractSpec::default()
        };
        let err = spec.compile().unwrap_err().to_string();
        assert!(err.contains("[[["), "error should name the bad selector: {err}");
    }
}
