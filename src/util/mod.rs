//! Utility functions shared across the pipeline.
//!
//! - **URL normalization**: tracking-parameter removal from entry links
//! - **HTML sanitization**: best-effort strip of styles and script blocks
//! - **Timestamp normalization**: heterogeneous source dates to UTC

mod html;
mod time;
mod url;

pub use html::sanitize_html;
pub use time::{resolve_timestamp, RawTimestamp};
pub use url::normalize_url;

/// Returns the first candidate that is non-empty after trimming.
///
/// The ordered fallback chain behind guid derivation, dedup keys, and the
/// serializer's entry ids.
pub fn first_non_empty<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates.into_iter().map(str::trim).find(|s| !s.is_empty())
}
