//! HTTP fetching of listing pages.
//!
//! One shared client is built per run with an ordinary desktop browser
//! identity and a request timeout. Fetching is the only network I/O in the
//! pipeline; extraction operates on the returned body.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Build the shared HTTP client used for all page fetches.
pub fn build_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// Fetch a listing page and return its body.
///
/// Non-2xx responses are errors; callers treat a failed fetch as a failed
/// feed and move on to the next one.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, Box<dyn Error>> {
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.text().await?;
    info!(bytes = body.len(), "Fetched listing page");
    Ok(body)
}
