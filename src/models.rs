//! Data models for extracted articles.
//!
//! The central type is [`ArticleRecord`]: one title/link/date/summary tuple
//! pulled out of a listing page. Records are built transiently per extraction
//! run and never mutated afterwards; they are either emitted into a feed or
//! discarded.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single article extracted from a news listing page.
///
/// # Invariants
///
/// * `title` is non-empty and within the configured length bounds.
/// * `url` is an absolute `http`/`https` URI, already resolved against the
///   feed's base URL.
/// * `published_at` is a best-effort parse of whatever date text the page
///   exposed; when nothing parseable was found it is the extraction time.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleRecord {
    /// The article headline.
    pub title: String,
    /// Absolute link to the article, also used as the feed item's permalink.
    pub url: String,
    /// Publication timestamp, normalized to UTC.
    pub published_at: DateTime<Utc>,
    /// Optional excerpt, truncated to the configured cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl ArticleRecord {
    /// Extract the domain label (before .com/.org/etc) from the article URL.
    /// For example: "https://www.foxnews.com/article" -> "foxnews"
    ///
    /// Aggregator pages link out to many different sites; this is used to
    /// log how diverse a batch of extracted links is.
    pub fn source_domain(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.url).ok()?;
        let host = parsed.host_str()?;
        let parts: Vec<&str> = host.split('.').collect();
        // Handle cases like "www.foxnews.com" -> "foxnews" or "foxnews.com" -> "foxnews"
        if parts.len() >= 2 {
            Some(parts[parts.len() - 2].to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(url: &str) -> ArticleRecord {
        ArticleRecord {
            title: "Some reasonably long headline".to_string(),
            url: url.to_string(),
            published_at: Utc.with_ymd_and_hms(2025, 5, 6, 12, 0, 0).unwrap(),
            summary: None,
        }
    }

    #[test]
    fn test_source_domain_with_www() {
        assert_eq!(
            record("https://www.foxnews.com/politics/story").source_domain(),
            Some("foxnews".to_string())
        );
    }

    #[test]
    fn test_source_domain_with_subdomain() {
        assert_eq!(
            record("https://lite.cnn.com/2025/05/06/article").source_domain(),
            Some("cnn".to_string())
        );
    }

    #[test]
    fn test_source_domain_simple() {
        assert_eq!(
            record("https://example.com/article").source_domain(),
            Some("example".to_string())
        );
    }

    #[test]
    fn test_source_domain_unparseable() {
        assert_eq!(record("not a url").source_domain(), None);
    }

    #[test]
    fn test_serialization_skips_missing_summary() {
        let json = serde_json::to_string(&record("https://example.com/a")).unwrap();
        assert!(json.contains("\"url\":\"https://example.com/a\""));
        assert!(!json.contains("summary"));
    }

    #[test]
    fn test_serialization_includes_summary() {
        let mut rec = record("https://example.com/a");
        rec.summary = Some("A short excerpt of the article body.".to_string());
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("A short excerpt"));
    }
}
