//! Heuristic extraction of article records from a news listing page.
//!
//! Listing pages don't announce where their articles live, so extraction
//! probes ordered lists of candidate CSS selectors: the first container
//! selector that matches anything supplies candidate containers, and within
//! each container the title/date/summary selectors are tried front to back
//! until one yields usable text. Containers that produce no usable title or
//! link are skipped without failing the batch; one broken card never takes
//! down the rest of the page.
//!
//! Extraction is synchronous and performs no I/O. It operates over an
//! already-fetched document and owns no state beyond the run-scoped [`Seen`]
//! set, so independent runs can proceed concurrently without coordination.

use crate::dates;
use crate::models::ArticleRecord;
use crate::utils::{collapse_ws, truncate_chars};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

static ANCHOR_WITH_HREF: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static TIME_WITH_DATETIME: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time[datetime]").unwrap());

/// Which field(s) seed the duplicate check within a run.
///
/// Sources differ on what uniquely identifies an article: most listing
/// pages key on the link, title-only layouts key on the headline, and
/// aggregator pages (which repeat both across sections) key on both at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupeKey {
    /// The resolved absolute URL (first occurrence wins).
    #[default]
    Url,
    /// The trimmed title text.
    Title,
    /// Both: a record is a duplicate if either its URL or its title was seen.
    UrlAndTitle,
}

/// Compiled extraction configuration for one feed.
///
/// Selector lists are ordered candidate lists, tried front to back. Built
/// from [`crate::config::ExtractSpec`], which validates the raw selector
/// strings at config-load time.
#[derive(Debug)]
pub struct ExtractConfig {
    pub containers: Vec<Selector>,
    pub titles: Vec<Selector>,
    pub dates: Vec<Selector>,
    pub summaries: Vec<Selector>,
    /// Titles shorter than this are nav links, not headlines.
    pub min_title_len: usize,
    /// Titles longer than this are run-together container text.
    pub max_title_len: usize,
    /// A summary must exceed this many chars to count as substantive.
    pub min_summary_len: usize,
    pub max_summary_len: usize,
    /// At most this many candidate containers are examined per run.
    pub scan_cap: usize,
    /// At most this many records are returned, applied after the date sort.
    pub max_items: usize,
    pub dedupe_key: DedupeKey,
    /// Lowercased URL path fragments that mark a link as site navigation.
    pub deny_paths: Vec<String>,
}

impl ExtractConfig {
    /// Content-relevance predicate: does this resolved link point at a real
    /// article rather than site navigation? Evaluated after link resolution
    /// and before the duplicate check. The title takes no part in the
    /// decision today (length bounds already filtered it) but is part of the
    /// predicate's contract.
    fn is_article(&self, url: &str, _title: &str) -> bool {
        let lowered = url.to_lowercase();
        !self.deny_paths.iter().any(|frag| lowered.contains(frag))
    }
}

/// Why a candidate container produced no record.
///
/// These are expected absences, not errors: each is logged at debug level
/// and the scan moves on to the next container. Nothing here ever aborts a
/// run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// No title selector matched and no anchor had usable link text.
    NoTitle,
    /// Title fell outside the configured length bounds.
    TitleLength,
    /// No anchor with an `href` attribute inside the container.
    NoLink,
    /// The href was not a `/`-relative path or absolute http(s) URI
    /// (`javascript:`, `mailto:`, fragment-only, and friends).
    NonNavigable,
    /// The resolved URL matched a navigation denylist fragment.
    Navigation,
    /// A record with this URL/title was already accepted this run.
    Duplicate,
}

/// Run-scoped record of URLs and titles already accepted.
///
/// Owned by a single extraction run; never shared across runs, so concurrent
/// extractions stay independent.
#[derive(Debug, Default)]
pub struct Seen {
    urls: HashSet<String>,
    titles: HashSet<String>,
}

impl Seen {
    /// Returns `true` when the record is fresh under `key`, marking it seen.
    fn check_and_insert(&mut self, key: DedupeKey, url: &str, title: &str) -> bool {
        match key {
            DedupeKey::Url => self.urls.insert(url.to_string()),
            DedupeKey::Title => self.titles.insert(title.to_string()),
            DedupeKey::UrlAndTitle => {
                if self.urls.contains(url) || self.titles.contains(title) {
                    return false;
                }
                self.urls.insert(url.to_string());
                self.titles.insert(title.to_string());
                true
            }
        }
    }
}

/// Extract a deduplicated, date-ordered list of article records.
///
/// Candidate containers are gathered by applying each container selector in
/// order and concatenating the matches (a node matched by two selectors is
/// resolved later by the duplicate check, not here). Containers are
/// processed in encounter order up to `scan_cap`; the result is sorted by
/// `published_at` descending (stable, so same-timestamp records keep
/// encounter order) and capped at `max_items`.
///
/// Never fails: per-container problems are skipped, and a page with nothing
/// extractable yields an empty vector, which callers treat as "no content
/// produced."
pub fn extract(
    document: &Html,
    base: &Url,
    config: &ExtractConfig,
    seen: &mut Seen,
) -> Vec<ArticleRecord> {
    let now = Utc::now();
    let containers: Vec<ElementRef> = config
        .containers
        .iter()
        .flat_map(|sel| document.select(sel))
        .take(config.scan_cap)
        .collect();
    debug!(count = containers.len(), "Gathered candidate containers");

    let mut records = Vec::new();
    for container in containers {
        match extract_container(container, base, config, seen, now) {
            Ok(record) => records.push(record),
            Err(reason) => debug!(?reason, "Skipped container"),
        }
    }

    records.sort_by_key(|r| std::cmp::Reverse(r.published_at));
    records.truncate(config.max_items);
    records
}

fn extract_container(
    container: ElementRef,
    base: &Url,
    config: &ExtractConfig,
    seen: &mut Seen,
    now: DateTime<Utc>,
) -> Result<ArticleRecord, Skip> {
    let title = resolve_title(container, config).ok_or(Skip::NoTitle)?;
    let title_len = title.chars().count();
    if title_len < config.min_title_len || title_len > config.max_title_len {
        return Err(Skip::TitleLength);
    }

    let url = resolve_link(container, base)?;
    if !config.is_article(&url, &title) {
        return Err(Skip::Navigation);
    }
    if !seen.check_and_insert(config.dedupe_key, &url, &title) {
        return Err(Skip::Duplicate);
    }

    let published_at = resolve_date(container, config, now);
    let summary = resolve_summary(container, config);

    Ok(ArticleRecord {
        title,
        url,
        published_at,
        summary,
    })
}

/// Try each title selector in order; the first match with non-empty trimmed
/// text wins. Falls back to the first anchor's link text.
fn resolve_title(container: ElementRef, config: &ExtractConfig) -> Option<String> {
    for sel in &config.titles {
        if let Some(el) = container.select(sel).next() {
            let text = element_text(&el);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    for el in container.select(&ANCHOR) {
        let text = element_text(&el);
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

/// Resolve the first `a[href]` inside the container to an absolute URL.
///
/// `/`-prefixed paths join against the base URL. Anything that is neither
/// `/`-relative nor an absolute http(s) URI is non-navigable (`javascript:`,
/// `mailto:`, bare fragments) and skips the container.
fn resolve_link(container: ElementRef, base: &Url) -> Result<String, Skip> {
    let anchor = container
        .select(&ANCHOR_WITH_HREF)
        .next()
        .ok_or(Skip::NoLink)?;
    let href = anchor.value().attr("href").unwrap_or_default().trim();

    if href.starts_with('/') {
        return base
            .join(href)
            .map(|u| u.to_string())
            .map_err(|_| Skip::NonNavigable);
    }
    match Url::parse(href) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url.to_string()),
        _ => Err(Skip::NonNavigable),
    }
}

/// Try each date selector in order and parse the first non-empty text match;
/// unparseable text falls back to `now` rather than probing further. When no
/// selector yields text, a `<time datetime>` attribute is consulted, then a
/// long-month date scanned out of the container's full text, then `now`.
fn resolve_date(container: ElementRef, config: &ExtractConfig, now: DateTime<Utc>) -> DateTime<Utc> {
    for sel in &config.dates {
        if let Some(el) = container.select(sel).next() {
            let text = element_text(&el);
            if !text.is_empty() {
                return dates::parse_date_text(&text).unwrap_or(now);
            }
        }
    }
    if let Some(el) = container.select(&TIME_WITH_DATETIME).next() {
        if let Some(parsed) = el
            .value()
            .attr("datetime")
            .and_then(dates::parse_datetime_attr)
        {
            return parsed;
        }
    }
    dates::scan_date_in_text(&element_text(&container)).unwrap_or(now)
}

/// Accept the first summary candidate whose trimmed text exceeds the
/// substantive-length floor, truncated to the configured cap.
fn resolve_summary(container: ElementRef, config: &ExtractConfig) -> Option<String> {
    for sel in &config.summaries {
        if let Some(el) = container.select(sel).next() {
            let text = element_text(&el);
            if text.chars().count() > config.min_summary_len {
                return Some(truncate_chars(&text, config.max_summary_len));
            }
        }
    }
    None
}

fn element_text(el: &ElementRef) -> String {
    collapse_ws(&el.text().collect::<Vec<_>>().join(" "))
}
