use crate::types::{AggregatorError, NewsItem, Result};
use crate::utils::{text::clean_title, time::parse_pub_date};
use feed_rs::parser;
use serde::Deserialize;
use tracing::debug;

/// Items decoded from one feed, plus the title the feed gives itself.
#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub items: Vec<NewsItem>,
}

// Payload of an rss2json-style conversion endpoint.
#[derive(Debug, Deserialize)]
struct ProxyPayload {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    feed: Option<ProxyFeedInfo>,
    items: Option<Vec<ProxyItem>>,
}

#[derive(Debug, Deserialize)]
struct ProxyFeedInfo {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProxyItem {
    title: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default, rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub struct FeedParser;

impl FeedParser {
    /// Decode a conversion-endpoint payload. Anything other than
    /// `status: "ok"` with an item list is an error.
    pub fn parse_proxy_payload(content: &str) -> Result<ParsedFeed> {
        let payload: ProxyPayload = serde_json::from_str(content)
            .map_err(|e| AggregatorError::Parse(format!("Malformed feed payload: {}", e)))?;

        if payload.status != "ok" {
            let reason = payload.message.unwrap_or_else(|| "no message".to_string());
            return Err(AggregatorError::Parse(format!(
                "Feed payload status '{}': {}",
                payload.status, reason
            )));
        }

        let raw_items = payload
            .items
            .ok_or_else(|| AggregatorError::Parse("Feed payload has no item list".to_string()))?;

        let title = payload.feed.and_then(|feed| feed.title);
        let items: Vec<NewsItem> = raw_items
            .into_iter()
            .map(|item| NewsItem {
                title: clean_title(&item.title),
                link: item.link.unwrap_or_default(),
                published_at: item.pub_date.as_deref().and_then(parse_pub_date),
                description: item.description.unwrap_or_default(),
                source: title.clone().unwrap_or_default(),
            })
            .collect();

        debug!("Decoded {} items from feed payload", items.len());

        Ok(ParsedFeed { title, items })
    }

    /// Decode a raw RSS or Atom document.
    pub fn parse_feed_document(content: &[u8]) -> Result<ParsedFeed> {
        let feed = parser::parse(content)
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let items: Vec<NewsItem> = feed
            .entries
            .into_iter()
            .map(|entry| {
                let description = entry
                    .summary
                    .map(|s| s.content)
                    .or_else(|| entry.content.and_then(|c| c.body))
                    .unwrap_or_default();

                NewsItem {
                    title: entry.title.map(|t| clean_title(&t.content)).unwrap_or_default(),
                    link: entry.links.first().map(|l| l.href.clone()).unwrap_or_default(),
                    published_at: entry.published.or(entry.updated),
                    description,
                    source: title.clone().unwrap_or_default(),
                }
            })
            .collect();

        debug!("Parsed feed document with {} entries", items.len());

        Ok(ParsedFeed { title, items })
    }
}
