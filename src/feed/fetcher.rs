use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;

use crate::feed::parser::{self, Entry};

/// Identifying User-Agent sent with every source fetch.
pub const USER_AGENT: &str = "feedmux/1.0 (+github actions)";

/// Per-source fetch timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

const MAX_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while loading a single source feed.
///
/// Every variant is recoverable at the run level: the failing source is
/// logged as a warning, contributes zero entries, and the remaining
/// sources are still processed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the per-source timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Document could not be parsed as a syndication feed
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Loads every configured source and returns the flat collection of
/// normalized entries.
///
/// Sources are fetched strictly sequentially in list order, which makes
/// downstream deduplication deterministic: the first source listing an
/// item wins. A failing source is reported as a warning and skipped; no
/// retries are performed within a run, the next scheduled run retries
/// naturally.
pub async fn load_all(client: &reqwest::Client, urls: &[String]) -> Vec<Entry> {
    let mut entries = Vec::new();
    for url in urls {
        match load_source(client, url).await {
            Ok(mut loaded) => {
                tracing::debug!(source = %url, count = loaded.len(), "Loaded source");
                entries.append(&mut loaded);
            }
            Err(e) => {
                tracing::warn!(source = %url, error = %e, "Skipping source");
            }
        }
    }
    entries
}

/// Fetches one source and maps its raw entries into [`Entry`] records.
async fn load_source(client: &reqwest::Client, url: &str) -> Result<Vec<Entry>, FetchError> {
    let response = tokio::time::timeout(FETCH_TIMEOUT, client.get(url).send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_BODY_SIZE).await?;

    let feed =
        feed_rs::parser::parse(bytes.as_slice()).map_err(|e| FetchError::Parse(e.to_string()))?;
    let source = parser::source_title(&feed, url);
    Ok(parser::map_entries(feed, &source))
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: reject oversized documents from the Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
