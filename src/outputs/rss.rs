//! RSS 2.0 serialization.
//!
//! Renders a channel plus one `<item>` per extracted record. The item's
//! `guid` is the article link marked as a permalink, so feed readers key
//! entries off the same URL the dedupe step did. Text content is
//! entity-escaped by the writer; the document is pretty-printed with
//! two-space indentation.

use crate::config::ChannelMeta;
use crate::models::ArticleRecord;
use chrono::Utc;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Render an RSS 2.0 document for one channel.
pub fn render_channel(
    channel: &ChannelMeta,
    page_url: &str,
    records: &[ArticleRecord],
) -> Result<String, Box<dyn Error>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut rss_start = BytesStart::new("rss");
    rss_start.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss_start))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &channel.title)?;
    write_text_element(&mut writer, "link", page_url)?;
    write_text_element(&mut writer, "description", &channel.description)?;
    write_text_element(&mut writer, "language", &channel.language)?;
    write_text_element(&mut writer, "lastBuildDate", &Utc::now().to_rfc2822())?;

    for record in records {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        write_text_element(&mut writer, "title", &record.title)?;
        write_text_element(&mut writer, "link", &record.url)?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "true"));
        writer.write_event(Event::Start(guid))?;
        writer.write_event(Event::Text(BytesText::new(&record.url)))?;
        writer.write_event(Event::End(BytesEnd::new("guid")))?;

        write_text_element(&mut writer, "pubDate", &record.published_at.to_rfc2822())?;
        if let Some(summary) = &record.summary {
            write_text_element(&mut writer, "description", summary)?;
        }
        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(String::from_utf8(out)?)
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    text: &str,
) -> Result<(), Box<dyn Error>> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Render and write one feed file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn write_channel(
    path: &str,
    channel: &ChannelMeta,
    page_url: &str,
    records: &[ArticleRecord],
) -> Result<(), Box<dyn Error>> {
    let xml = render_channel(channel, page_url, records)?;
    fs::write(path, xml).await?;
    info!(items = records.len(), "Wrote RSS feed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn channel() -> ChannelMeta {
        ChannelMeta {
            title: "Example News".to_string(),
            description: "Articles from the example.com newsroom".to_string(),
            language: "en".to_string(),
        }
    }

    fn record() -> ArticleRecord {
        ArticleRecord {
            title: "A perfectly ordinary headline".to_string(),
            url: "https://example.com/news/a".to_string(),
            published_at: Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap(),
            summary: None,
        }
    }

    #[test]
    fn test_channel_structure() {
        let xml = render_channel(&channel(), "https://example.com/news/", &[record()]).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains(r#"<rss version="2.0">"#));
        assert!(xml.contains("<title>Example News</title>"));
        assert!(xml.contains("<link>https://example.com/news/</link>"));
        assert!(xml.contains("<language>en</language>"));
        assert!(xml.contains("<lastBuildDate>"));
        assert!(xml.ends_with("</rss>\n"));
    }

    #[test]
    fn test_item_fields() {
        let xml = render_channel(&channel(), "https://example.com/news/", &[record()]).unwrap();
        assert!(xml.contains("<title>A perfectly ordinary headline</title>"));
        assert!(xml.contains("<link>https://example.com/news/a</link>"));
        assert!(xml.contains(r#"<guid isPermaLink="true">https://example.com/news/a</guid>"#));
        assert!(xml.contains("<pubDate>Wed, 15 Jan 2025 00:00:00 +0000</pubDate>"));
        // No summary, no description on the item.
        assert_eq!(xml.matches("<description>").count(), 1);
    }

    #[test]
    fn test_summary_becomes_item_description() {
        let mut rec = record();
        rec.summary = Some("An excerpt of the article body text.".to_string());
        let xml = render_channel(&channel(), "https://example.com/news/", &[rec]).unwrap();
        assert!(xml.contains("<description>An excerpt of the article body text.</description>"));
    }

    #[test]
    fn test_markup_significant_text_is_escaped() {
        let mut rec = record();
        rec.title = "AT&T expands <fiber> rollout".to_string();
        let xml = render_channel(&channel(), "https://example.com/news/", &[rec]).unwrap();
        assert!(xml.contains("AT&amp;T expands &lt;fiber&gt; rollout"));
        assert!(!xml.contains("<fiber>"));
    }

    #[test]
    fn test_empty_record_list_is_valid_channel() {
        let xml = render_channel(&channel(), "https://example.com/news/", &[]).unwrap();
        assert!(xml.contains("<channel>"));
        assert!(!xml.contains("<item>"));
    }
}
