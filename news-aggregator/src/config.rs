use crate::sources::DEFAULT_PROXY_URL;
use crate::types::{AggregatorError, FeedSource, FetchConfig, Result, SectorCatalog, SectorDefinition};
use crate::utils::url::is_valid_feed_url;
use crate::view::DEFAULT_SUMMARY_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const ENV_PROXY_URL: &str = "PULSE_PROXY_URL";
pub const ENV_SOURCE_TIMEOUT: &str = "PULSE_SOURCE_TIMEOUT_SECS";
pub const ENV_SUMMARY_LIMIT: &str = "PULSE_SUMMARY_LIMIT";

/// Static configuration of the news pipeline, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub proxy_url: String,
    pub feeds: Vec<FeedSource>,
    pub sectors: SectorCatalog,
    pub fetch: FetchConfig,
    pub summary_limit: usize,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            feeds: default_feeds(),
            sectors: default_sectors(),
            fetch: FetchConfig::default(),
            summary_limit: DEFAULT_SUMMARY_LIMIT,
        }
    }
}

impl PulseConfig {
    /// Defaults, then the JSON file if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                let content = std::fs::read_to_string(path)?;
                Self::from_json(&content)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(content)?;
        config.sectors = normalize_sectors(&config.sectors);
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in `load`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(proxy_url) = lookup(ENV_PROXY_URL) {
            debug!("{} overrides proxy url", ENV_PROXY_URL);
            self.proxy_url = proxy_url;
        }
        if let Some(raw) = lookup(ENV_SOURCE_TIMEOUT) {
            self.fetch.source_timeout_seconds = parse_number(ENV_SOURCE_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SUMMARY_LIMIT) {
            self.summary_limit = parse_number(ENV_SUMMARY_LIMIT, &raw)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_feed_url(&self.proxy_url) {
            return Err(AggregatorError::Config(format!("invalid proxy url '{}'", self.proxy_url)));
        }
        for feed in &self.feeds {
            if feed.name.trim().is_empty() {
                return Err(AggregatorError::Config(format!("feed {} has no name", feed.url)));
            }
            if !is_valid_feed_url(&feed.url) {
                return Err(AggregatorError::Config(format!("invalid url for feed {}: '{}'", feed.name, feed.url)));
            }
        }
        if self.summary_limit == 0 {
            return Err(AggregatorError::Config("summary_limit must be at least 1".to_string()));
        }
        if self.fetch.source_timeout_seconds == 0 {
            return Err(AggregatorError::Config("source_timeout_seconds must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn source_timeout(&self) -> Duration {
        self.fetch.source_timeout()
    }

    /// Map a user-supplied sector id onto a configured one. Ids are stored
    /// lowercase, so matching ignores case and surrounding whitespace.
    pub fn resolve_sector(&self, raw: &str) -> Result<String> {
        let id = raw.trim().to_lowercase();
        if self.sectors.contains(&id) {
            Ok(id)
        } else {
            Err(AggregatorError::Config(format!("unknown sector '{}'", raw)))
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AggregatorError::Config(format!("{} must be a positive number, got '{}'", key, raw)))
}

fn normalize_sectors(sectors: &SectorCatalog) -> SectorCatalog {
    SectorCatalog::new(
        sectors
            .iter()
            .map(|sector| SectorDefinition {
                id: sector.id.to_lowercase(),
                keywords: sector.keywords.iter().map(|keyword| keyword.to_lowercase()).collect(),
            })
            .collect(),
    )
}

pub fn default_feeds() -> Vec<FeedSource> {
    vec![
        FeedSource::new("https://www.cnbc.com/id/10001147/device/rss/rss.html", "CNBC"),
        FeedSource::new("https://www.cnbc.com/id/20910258/device/rss/rss.html", "CNBC Economy"),
        FeedSource::new(
            "https://feeds.finance.yahoo.com/rss/2.0/headline?s=^GSPC&region=US&lang=en-US",
            "Yahoo Finance",
        ),
    ]
}

pub fn default_sectors() -> SectorCatalog {
    SectorCatalog::new(vec![
        SectorDefinition::new(
            "technology",
            &["tech", "software", "apple", "microsoft", "google", "nvidia", "semiconductor", "ai", "chip", "cloud"],
        ),
        SectorDefinition::new(
            "healthcare",
            &["health", "pharma", "biotech", "drug", "fda", "medical", "hospital", "vaccine"],
        ),
        SectorDefinition::new(
            "financials",
            &["bank", "finance", "rate", "fed", "interest", "loan", "credit", "goldman", "jpmorgan", "morgan stanley"],
        ),
        SectorDefinition::new(
            "energy",
            &["oil", "gas", "energy", "exxon", "chevron", "crude", "opec", "petroleum", "renewable"],
        ),
        SectorDefinition::new(
            "consumer",
            &["retail", "consumer", "amazon", "walmart", "target", "shop", "spend", "sales"],
        ),
        SectorDefinition::new(
            "industrials",
            &["industrial", "manufacturing", "boeing", "caterpillar", "construction", "aerospace"],
        ),
        SectorDefinition::new(
            "utilities",
            &["utility", "utilities", "electric", "power", "grid", "water"],
        ),
        SectorDefinition::new(
            "materials",
            &["material", "mining", "steel", "aluminum", "chemical", "gold", "copper"],
        ),
        SectorDefinition::new(
            "realestate",
            &["real estate", "property", "housing", "mortgage", "reit", "home"],
        ),
        SectorDefinition::new(
            "communication",
            &["media", "telecom", "netflix", "disney", "meta", "facebook", "communication"],
        ),
    ])
}
