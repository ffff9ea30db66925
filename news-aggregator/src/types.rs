use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
// Use the interfaces crate for core types
pub use interfaces::defs::{FeedSource, NewsItem, SectorCatalog, SectorDefinition};
pub use interfaces::state::{FilterAction, FilterState};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    /// Timeout for a single HTTP request.
    pub timeout_seconds: u64,
    /// Upper bound for one source within an aggregation cycle, retries included.
    pub source_timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl FetchConfig {
    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_seconds)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "MarketPulse-News/1.0".to_string(),
            timeout_seconds: 10,
            source_timeout_seconds: 15,
            max_retries: 2,
            retry_delay_ms: 500,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// Result of one completed aggregation cycle.
#[derive(Debug, Clone, Serialize)]
pub struct NewsCollection {
    pub cycle_id: Uuid,
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    pub items: Vec<NewsItem>,
    pub sources_ok: usize,
    pub sources_failed: usize,
}

impl NewsCollection {
    /// Placeholder held before the first cycle completes.
    pub fn empty() -> Self {
        Self {
            cycle_id: Uuid::nil(),
            generation: 0,
            loaded_at: Utc::now(),
            items: Vec::new(),
            sources_ok: 0,
            sources_failed: 0,
        }
    }

    /// True when no source produced a usable payload, including when none
    /// were configured.
    pub fn all_sources_failed(&self) -> bool {
        self.sources_ok == 0
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum CycleOutcome {
    Completed(Arc<NewsCollection>),
    /// A newer cycle started before this one finished; nothing was committed.
    Superseded,
}

impl CycleOutcome {
    pub fn collection(&self) -> Option<&Arc<NewsCollection>> {
        match self {
            CycleOutcome::Completed(collection) => Some(collection),
            CycleOutcome::Superseded => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Timed out after {timeout:?} fetching {source_name}")]
    Timeout { source_name: String, timeout: Duration },

    #[error("Feed body of at least {bytes} bytes exceeds the {limit_mb}MB limit")]
    FeedTooLarge { bytes: u64, limit_mb: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
