//! Dedup, filter, sort, cap, and fallback-timestamp stages.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::config::Config;
use crate::feed::Entry;
use crate::util::first_non_empty;

/// Reduces the flat collection of loaded entries to the final ordered,
/// capped sequence.
///
/// The stage order is load-bearing: filtering runs after dedup, sorting
/// after filtering, and the synthetic fallback timestamps are assigned
/// only to the final capped sequence, so the recency filter never sees
/// them. `now` is injected so the recency cutoff and fallback values are
/// deterministic under test.
pub fn aggregate(mut entries: Vec<Entry>, config: &Config, now: DateTime<Utc>) -> Vec<Entry> {
    dedup(&mut entries);

    if !config.keywords.is_empty() {
        entries.retain(|e| matches_keywords(e, &config.keywords));
    }

    if config.since_days > 0 {
        let cutoff = now - Duration::days(config.since_days);
        entries.retain(|e| e.updated.is_some_and(|updated| updated >= cutoff));
    }

    // Stable sort: equal timestamps keep their relative input order, and
    // entries without a timestamp sort last.
    entries.sort_by(|a, b| b.updated.cmp(&a.updated));
    entries.truncate(config.max_items);

    assign_fallback_timestamps(&mut entries, now);
    entries
}

/// Removes duplicates, keeping the first occurrence in input order.
///
/// Because sources are loaded in configuration order, the earliest listed
/// source wins when two sources carry the same item.
fn dedup(entries: &mut Vec<Entry>) {
    let mut seen = HashSet::new();
    entries.retain(|e| seen.insert(dedup_key(e)));
}

/// Identity key: lowercased first non-empty of (guid, link, title). Two
/// guid-less entries sharing a link collapse even when their titles
/// differ.
fn dedup_key(entry: &Entry) -> String {
    first_non_empty([
        entry.guid.as_str(),
        entry.link.as_str(),
        entry.title.as_str(),
    ])
    .unwrap_or_default()
    .to_lowercase()
}

fn matches_keywords(entry: &Entry, keywords: &[String]) -> bool {
    let haystack = format!("{} {}", entry.title, entry.summary).to_lowercase();
    keywords.iter().any(|keyword| haystack.contains(keyword.as_str()))
}

/// Entries that survived every stage without a real timestamp receive
/// unique synthetic ones, counting back one second per timestamp-less
/// entry in final order, so downstream consumers see a deterministic
/// relative order instead of a pile of identical values.
fn assign_fallback_timestamps(entries: &mut [Entry], now: DateTime<Utc>) {
    let mut offset = 0;
    for entry in entries.iter_mut().filter(|e| e.updated.is_none()) {
        entry.updated = Some(now - Duration::seconds(offset));
        offset += 1;
    }
}
