#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use news_aggregator::{AggregatorError, FeedClient, FeedSource, NewsItem, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Fixed "now" so relative timestamps in tests are deterministic.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 15, 12, 0, 0).unwrap()
}

pub fn item(title: &str, minutes_ago: i64) -> NewsItem {
    item_with_description(title, "", minutes_ago)
}

pub fn item_with_description(title: &str, description: &str, minutes_ago: i64) -> NewsItem {
    NewsItem {
        title: title.to_string(),
        link: format!("https://news.example.com/{}", title.to_lowercase().replace(' ', "-")),
        published_at: Some(fixed_now() - Duration::minutes(minutes_ago)),
        description: description.to_string(),
        source: String::new(),
    }
}

pub fn undated_item(title: &str) -> NewsItem {
    NewsItem {
        published_at: None,
        ..item(title, 0)
    }
}

pub fn source(slug: &str, name: &str) -> FeedSource {
    FeedSource::new(&format!("https://feeds.example.com/{}.xml", slug), name)
}

#[derive(Clone)]
enum Script {
    Items(Vec<NewsItem>),
    Fail,
    Hang,
}

/// Feed client answering from a per-url script instead of the network.
pub struct ScriptedFeedClient {
    scripts: HashMap<String, (std::time::Duration, Script)>,
    calls: AtomicUsize,
}

impl ScriptedFeedClient {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_items(self, source: &FeedSource, items: Vec<NewsItem>) -> Self {
        self.with_delayed_items(source, std::time::Duration::ZERO, items)
    }

    pub fn with_delayed_items(mut self, source: &FeedSource, delay: std::time::Duration, items: Vec<NewsItem>) -> Self {
        self.scripts.insert(source.url.clone(), (delay, Script::Items(items)));
        self
    }

    pub fn with_failure(mut self, source: &FeedSource) -> Self {
        self.scripts.insert(source.url.clone(), (std::time::Duration::ZERO, Script::Fail));
        self
    }

    /// Source that never answers.
    pub fn with_hang(mut self, source: &FeedSource) -> Self {
        self.scripts.insert(source.url.clone(), (std::time::Duration::ZERO, Script::Hang));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedClient for ScriptedFeedClient {
    fn client_name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch(&self, source: &FeedSource) -> Result<Vec<NewsItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let Some((delay, script)) = self.scripts.get(&source.url).cloned() else {
            return Err(AggregatorError::Parse(format!("no script for {}", source.url)));
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match script {
            Script::Items(items) => Ok(items),
            Script::Fail => Err(AggregatorError::Status {
                status: 503,
                url: source.url.clone(),
            }),
            Script::Hang => std::future::pending().await,
        }
    }
}
