use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// A timestamp as it arrives from a source feed: either already parsed by
/// the feed library, or free-form text a source stuffed into a date field.
#[derive(Debug, Clone, Copy)]
pub enum RawTimestamp<'a> {
    Parsed(DateTime<Utc>),
    Text(&'a str),
}

/// Resolves an ordered list of candidates to a single UTC instant.
///
/// Already-parsed values pass through unchanged. Text is parsed
/// permissively: RFC 3339, RFC 2822, then a handful of common naive
/// layouts; a value without timezone information is assumed to be UTC.
/// Absent or unparsable candidates are skipped, and if none remain the
/// result is `None`; the caller decides fallback behavior. Never errors.
pub fn resolve_timestamp<'a, I>(candidates: I) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = Option<RawTimestamp<'a>>>,
{
    candidates.into_iter().flatten().find_map(|candidate| match candidate {
        RawTimestamp::Parsed(dt) => Some(dt),
        RawTimestamp::Text(text) => parse_text(text),
    })
}

/// Naive layouts seen in the wild when feeds skip the RFC formats.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}
