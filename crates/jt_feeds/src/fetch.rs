use std::time::Duration;

use feed_rs::model::Feed;
use feed_rs::parser;
use jt_core::{Article, Error, Result};
use reqwest::Client;

use crate::sources::FeedSource;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TOTAL_TIMEOUT_SECS: u64 = 30;
const MAX_REDIRECTS: usize = 5;
const USER_AGENT: &str = "jt3d/0.1 (RSS reader)";

/// Oversized responses are cut off rather than parsed.
const MAX_FEED_SIZE: u64 = 4 * 1024 * 1024;

/// Feed summaries get truncated to this many characters.
const MAX_SUMMARY_LEN: usize = 500;

/// Entries read per feed per poll. Feeds list their newest items first, so
/// a small window is enough when polling regularly.
const DEFAULT_PER_FEED: usize = 5;

/// Fetches a feed over HTTP and flattens its entries into articles.
pub struct FeedFetcher {
    client: Client,
    per_feed: usize,
}

impl FeedFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(TOTAL_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            per_feed: DEFAULT_PER_FEED,
        })
    }

    pub fn with_per_feed(mut self, per_feed: usize) -> Self {
        self.per_feed = per_feed.max(1);
        self
    }

    pub fn per_feed(&self) -> usize {
        self.per_feed
    }

    /// Fetch one source and return its newest entries as articles.
    pub async fn fetch(&self, source: &FeedSource) -> Result<Vec<Article>> {
        let response = self.client.get(&source.url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Feed(format!(
                "{} returned HTTP {}",
                source.name,
                response.status()
            )));
        }

        if let Some(length) = response.content_length() {
            if length > MAX_FEED_SIZE {
                return Err(Error::Feed(format!(
                    "{} feed too large: {} bytes",
                    source.name, length
                )));
            }
        }

        let bytes = response.bytes().await?;
        if bytes.len() as u64 > MAX_FEED_SIZE {
            return Err(Error::Feed(format!(
                "{} feed too large: {} bytes",
                source.name,
                bytes.len()
            )));
        }

        let feed = parser::parse(&bytes[..])
            .map_err(|e| Error::Feed(format!("{} parse failed: {}", source.name, e)))?;

        Ok(map_feed(source, feed, self.per_feed))
    }
}

/// Turn parsed feed entries into articles. Entries without a link have no
/// dedupe identity and are dropped.
pub(crate) fn map_feed(source: &FeedSource, feed: Feed, per_feed: usize) -> Vec<Article> {
    feed.entries
        .into_iter()
        .take(per_feed)
        .filter_map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone())?;
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Sans titre".to_string());
            let summary = entry
                .summary
                .map(|t| t.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .map(|raw| truncate_summary(&strip_html(&raw)))
                .unwrap_or_default();
            let published_at = entry.published.or(entry.updated);

            let mut article = Article::new(source.name.clone(), title, link).with_summary(summary);
            article.published_at = published_at;
            Some(article)
        })
        .collect()
}

/// Drop tags and decode the common entities from a feed summary. Feed
/// descriptions are routinely full HTML fragments.
pub(crate) fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut entity: Option<String> = None;

    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            '&' => entity = Some(String::new()),
            ';' if entity.is_some() => {
                let name = entity.take().unwrap_or_default();
                match name.as_str() {
                    "amp" => text.push('&'),
                    "lt" => text.push('<'),
                    "gt" => text.push('>'),
                    "quot" => text.push('"'),
                    "apos" => text.push('\''),
                    "nbsp" => text.push(' '),
                    _ => {
                        if let Some(decoded) = decode_numeric_entity(&name) {
                            text.push(decoded);
                        } else {
                            // Unknown entity, keep the raw form.
                            text.push('&');
                            text.push_str(&name);
                            text.push(';');
                        }
                    }
                }
            }
            _ => {
                if let Some(buf) = entity.as_mut() {
                    // Entities are short; anything longer is not one.
                    if buf.len() < 8 && (ch.is_ascii_alphanumeric() || ch == '#') {
                        buf.push(ch);
                    } else {
                        text.push('&');
                        text.push_str(buf);
                        text.push(ch);
                        entity = None;
                    }
                } else {
                    text.push(ch);
                }
            }
        }
    }
    if let Some(buf) = entity {
        text.push('&');
        text.push_str(&buf);
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_numeric_entity(name: &str) -> Option<char> {
    let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = name.strip_prefix('#') {
        dec.parse().ok()?
    } else {
        return None;
    };
    char::from_u32(code)
}

fn truncate_summary(text: &str) -> String {
    if text.chars().count() <= MAX_SUMMARY_LEN {
        text.to_string()
    } else {
        text.chars().take(MAX_SUMMARY_LEN).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> FeedSource {
        FeedSource::new("Test Feed", "https://example.com/feed.xml")
    }

    fn parse(xml: &str) -> Feed {
        parser::parse(xml.as_bytes()).unwrap()
    }

    const RSS_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <link>https://example.com</link>
    <item>
      <title>Printed bearings</title>
      <link>https://example.com/bearings</link>
      <guid>guid-1</guid>
      <description>&lt;p&gt;Bearings &amp;amp; bushings, printed.&lt;/p&gt;</description>
      <pubDate>Mon, 03 Feb 2025 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>No link here</title>
      <guid>guid-2</guid>
    </item>
    <item>
      <title>Resin tips</title>
      <link>https://example.com/resin</link>
      <guid>guid-3</guid>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_map_feed_rss() {
        let articles = map_feed(&source(), parse(RSS_FIXTURE), 10);
        assert_eq!(articles.len(), 2, "linkless entry must be dropped");

        let first = &articles[0];
        assert_eq!(first.source, "Test Feed");
        assert_eq!(first.title, "Printed bearings");
        assert_eq!(first.link, "https://example.com/bearings");
        assert_eq!(first.summary, "Bearings & bushings, printed.");
        assert!(first.published_at.is_some());

        assert_eq!(articles[1].summary, "");
        assert!(articles[1].published_at.is_none());
    }

    #[test]
    fn test_map_feed_respects_per_feed_cap() {
        let articles = map_feed(&source(), parse(RSS_FIXTURE), 1);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Printed bearings");
    }

    #[test]
    fn test_map_feed_atom() {
        let atom = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Channel uploads</title>
  <entry>
    <id>yt:video:abc</id>
    <title>Testing a new nozzle</title>
    <link href="https://www.youtube.com/watch?v=abc"/>
    <summary>Nozzle comparison</summary>
    <updated>2025-02-03T10:00:00Z</updated>
  </entry>
</feed>"#;
        let articles = map_feed(&source(), parse(atom), 5);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link, "https://www.youtube.com/watch?v=abc");
        assert!(articles[0].published_at.is_some(), "updated should backfill published");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello</p>"), "Hello");
        assert_eq!(strip_html("<a href=\"x\">link</a> text"), "link text");
        assert_eq!(strip_html("A &amp; B &lt;C&gt;"), "A & B <C>");
        assert_eq!(strip_html("x&nbsp;y"), "x y");
        assert_eq!(strip_html("&#65;&#x42;"), "AB");
        assert_eq!(strip_html("&unknownentity;"), "&unknownentity;");
        assert_eq!(strip_html("  spaced\n\tout  "), "spaced out");
    }

    #[test]
    fn test_stray_ampersand_survives() {
        assert_eq!(strip_html("fish & chips"), "fish & chips");
        assert_eq!(strip_html("ends with &"), "ends with &");
    }

    #[test]
    fn test_truncate_summary() {
        let short = "ok";
        assert_eq!(truncate_summary(short), short);

        let long = "é".repeat(MAX_SUMMARY_LEN + 50);
        assert_eq!(truncate_summary(&long).chars().count(), MAX_SUMMARY_LEN);
    }
}
