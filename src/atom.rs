//! Atom serializer.
//!
//! Renders the final entry sequence plus feed-level metadata into an
//! Atom document. Every textual field goes through the XML writer's
//! escaping except the summary body, which is embedded verbatim inside a
//! CDATA section so the sanitized HTML renders correctly downstream.

use std::io::Cursor;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::feed::Entry;
use crate::util::first_non_empty;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Renders the aggregate result as an Atom document.
///
/// `now` becomes the feed-level generation timestamp and the last-resort
/// `updated` value for any entry that somehow still lacks one.
pub fn render(entries: &[Entry], config: &Config, now: DateTime<Utc>) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .context("Failed to write XML declaration")?;

    let mut feed = BytesStart::new("feed");
    feed.push_attribute(("xmlns", ATOM_NS));
    writer
        .write_event(Event::Start(feed))
        .context("Failed to write feed element")?;

    write_text_element(&mut writer, "title", &config.feed_title)?;
    write_text_element(&mut writer, "updated", &now.to_rfc3339())?;
    write_text_element(&mut writer, "id", &config.self_url)?;

    let mut self_link = BytesStart::new("link");
    self_link.push_attribute(("rel", "self"));
    self_link.push_attribute(("href", config.self_url.as_str()));
    writer
        .write_event(Event::Empty(self_link))
        .context("Failed to write self link")?;

    write_author(&mut writer, &config.author_name)?;

    for entry in entries {
        write_entry(&mut writer, entry, config, now)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("feed")))
        .context("Failed to write feed end")?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).context("Generated Atom document is not valid UTF-8")
}

fn write_entry(writer: &mut XmlWriter, entry: &Entry, config: &Config, now: DateTime<Utc>) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("entry")))
        .context("Failed to write entry element")?;

    write_text_element(writer, "title", &entry.title)?;

    let mut link = BytesStart::new("link");
    link.push_attribute(("href", entry.link.as_str()));
    writer
        .write_event(Event::Empty(link))
        .context("Failed to write entry link")?;

    write_text_element(writer, "id", &entry_id(entry))?;

    let updated = entry.updated.unwrap_or(now);
    write_text_element(writer, "updated", &updated.to_rfc3339())?;

    let author = if entry.author.is_empty() {
        &config.author_name
    } else {
        &entry.author
    };
    write_author(writer, author)?;

    let mut summary = BytesStart::new("summary");
    summary.push_attribute(("type", "html"));
    writer
        .write_event(Event::Start(summary))
        .context("Failed to write summary element")?;
    writer
        .write_event(Event::CData(BytesCData::new(entry.summary.as_str())))
        .context("Failed to write summary content")?;
    writer
        .write_event(Event::End(BytesEnd::new("summary")))
        .context("Failed to write summary end")?;

    writer
        .write_event(Event::End(BytesEnd::new("entry")))
        .context("Failed to write entry end")?;
    Ok(())
}

/// Identifier for an entry element: the guid, else the link, else a
/// content hash so the element still carries a stable id.
fn entry_id(entry: &Entry) -> String {
    if let Some(id) = first_non_empty([entry.guid.as_str(), entry.link.as_str()]) {
        return id.to_string();
    }
    let hash = Sha256::digest(format!("{}{}", entry.title, entry.link).as_bytes());
    format!("{:x}", hash)
}

fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .with_context(|| format!("Failed to write {name} element"))?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .with_context(|| format!("Failed to write {name} text"))?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .with_context(|| format!("Failed to write {name} end"))?;
    Ok(())
}

fn write_author(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("author")))
        .context("Failed to write author element")?;
    write_text_element(writer, "name", name)?;
    writer
        .write_event(Event::End(BytesEnd::new("author")))
        .context("Failed to write author end")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn entry(guid: &str, title: &str, link: &str) -> Entry {
        Entry {
            title: title.to_string(),
            link: link.to_string(),
            guid: guid.to_string(),
            updated: Some(now()),
            summary: String::new(),
            author: "Source Name".to_string(),
        }
    }

    #[test]
    fn test_feed_level_metadata() {
        let config = Config::default();
        let doc = render(&[], &config, now()).unwrap();

        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(doc.contains(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#));
        assert!(doc.contains("<title>Personal Aggregated Feed</title>"));
        assert!(doc.contains("<id>https://example.com/feed.xml</id>"));
        assert!(doc.contains(r#"<link rel="self" href="https://example.com/feed.xml"/>"#));
        assert!(doc.contains("<name>Mario Fontana</name>"));
        assert!(doc.contains("<updated>2024-06-01T12:00:00+00:00</updated>"));
    }

    #[test]
    fn test_entry_fields_rendered() {
        let config = Config::default();
        let mut e = entry("guid-1", "A title", "https://example.com/a");
        e.summary = "<p>Hi</p>".to_string();
        let doc = render(&[e], &config, now()).unwrap();

        assert!(doc.contains("<title>A title</title>"));
        assert!(doc.contains(r#"<link href="https://example.com/a"/>"#));
        assert!(doc.contains("<id>guid-1</id>"));
        assert!(doc.contains("<name>Source Name</name>"));
    }

    #[test]
    fn test_text_fields_are_escaped() {
        let config = Config::default();
        let e = entry("g<1>", "Ampers & Sons <LLC>", "https://example.com/?a=1&b=2");
        let doc = render(&[e], &config, now()).unwrap();

        assert!(doc.contains("<title>Ampers &amp; Sons &lt;LLC&gt;</title>"));
        assert!(doc.contains("<id>g&lt;1&gt;</id>"));
        assert!(doc.contains("href=\"https://example.com/?a=1&amp;b=2\""));
        assert!(!doc.contains("Ampers & Sons <LLC>"));
    }

    #[test]
    fn test_summary_embedded_verbatim_in_cdata() {
        let config = Config::default();
        let mut e = entry("g1", "t", "https://example.com/a");
        e.summary = r#"<p class="x">Rendered &amp; kept</p>"#.to_string();
        let doc = render(&[e], &config, now()).unwrap();

        assert!(doc.contains(r#"<![CDATA[<p class="x">Rendered &amp; kept</p>]]>"#));
    }

    #[test]
    fn test_entry_id_falls_back_to_link_then_hash() {
        let config = Config::default();
        let link_only = entry("", "t", "https://example.com/a");
        let bare = entry("", "only title", "");
        let doc = render(&[link_only, bare], &config, now()).unwrap();

        assert!(doc.contains("<id>https://example.com/a</id>"));
        // A bare entry still gets a stable hash id (64 hex chars).
        let hash = format!("{:x}", Sha256::digest("only title".as_bytes()));
        assert!(doc.contains(&format!("<id>{hash}</id>")));
    }

    #[test]
    fn test_missing_updated_falls_back_to_now() {
        let config = Config::default();
        let mut e = entry("g1", "t", "");
        e.updated = None;
        let doc = render(&[e], &config, now()).unwrap();
        assert_eq!(doc.matches("<updated>2024-06-01T12:00:00+00:00</updated>").count(), 2);
    }

    #[test]
    fn test_entry_without_author_uses_feed_author() {
        let config = Config::default();
        let mut e = entry("g1", "t", "");
        e.author = String::new();
        let doc = render(&[e], &config, now()).unwrap();
        assert_eq!(doc.matches("<name>Mario Fontana</name>").count(), 2);
    }
}
