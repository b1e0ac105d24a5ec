use chrono::{DateTime, Utc};
use url::Url;

use crate::util::{first_non_empty, normalize_url, resolve_timestamp, sanitize_html, RawTimestamp};

/// One normalized syndicated item.
///
/// Produced per source feed by the loader and treated as immutable from
/// then on; the only later mutation is the aggregator's fallback
/// timestamp assignment on the final capped sequence.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Entry title, trimmed. May be empty.
    pub title: String,
    /// Normalized link URL. May be empty.
    pub link: String,
    /// Stable identifier: source id, else normalized link, else title.
    pub guid: String,
    /// Publication/update instant in UTC, when the source provided one.
    pub updated: Option<DateTime<Utc>>,
    /// Sanitized HTML summary. May be empty.
    pub summary: String,
    /// Display name attributed to the item, normally the source's name.
    pub author: String,
}

/// Derives the display name for a source feed.
///
/// Prefers the parsed feed's own title; falls back to the URL host with a
/// leading `www.` stripped, then to the raw URL itself.
pub fn source_title(feed: &feed_rs::model::Feed, url: &str) -> String {
    if let Some(title) = feed.title.as_ref() {
        let trimmed = title.content.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .host_str()
                .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
        })
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| url.to_string())
}

/// Maps a parsed feed's raw entries into normalized [`Entry`] records.
///
/// Field derivation per entry:
/// - `title`: trimmed raw title
/// - `link`: normalized first link href, falling back to the raw id
/// - `guid`: first non-empty of raw id, normalized link, title
/// - `updated`: update time before publication time, via the timestamp
///   normalizer
/// - `summary`: sanitized summary text, falling back to the content body
/// - `author`: the source display name
pub fn map_entries(feed: feed_rs::model::Feed, source: &str) -> Vec<Entry> {
    feed.entries
        .into_iter()
        .map(|raw| {
            let title = raw
                .title
                .as_ref()
                .map(|t| t.content.trim().to_string())
                .unwrap_or_default();

            let href = raw
                .links
                .first()
                .map(|l| l.href.as_str())
                .filter(|href| !href.trim().is_empty())
                .unwrap_or(raw.id.as_str());
            let link = normalize_url(href.trim());

            let guid = first_non_empty([raw.id.as_str(), link.as_str(), title.as_str()])
                .unwrap_or_default()
                .to_string();

            let updated = resolve_timestamp([
                raw.updated.map(RawTimestamp::Parsed),
                raw.published.map(RawTimestamp::Parsed),
            ]);

            let summary = raw
                .summary
                .map(|s| s.content)
                .or_else(|| raw.content.and_then(|c| c.body))
                .map(|text| sanitize_html(text.trim()))
                .unwrap_or_default();

            Entry {
                title,
                link,
                guid,
                updated,
                summary,
                author: source.to_string(),
            }
        })
        .collect()
}
