use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub url: String,
    pub name: String,
}

impl FeedSource {
    pub fn new(url: &str, name: &str) -> Self {
        Self {
            url: url.to_owned(),
            name: name.to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    // None when the feed gave no date or one we could not parse.
    pub published_at: Option<DateTime<Utc>>,
    pub description: String,
    pub source: String,
}

impl NewsItem {
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_owned();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorDefinition {
    pub id: String,
    pub keywords: Vec<String>,
}

impl SectorDefinition {
    pub fn new(id: &str, keywords: &[&str]) -> Self {
        Self {
            id: id.to_owned(),
            keywords: keywords.iter().map(|keyword| keyword.to_lowercase()).collect(),
        }
    }

    /// Display form of the identifier, e.g. "energy" -> "Energy".
    pub fn label(&self) -> String {
        let mut chars = self.id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Sector definitions in configuration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectorCatalog {
    sectors: Vec<SectorDefinition>,
}

impl SectorCatalog {
    pub fn new(sectors: Vec<SectorDefinition>) -> Self {
        Self { sectors }
    }

    pub fn get(&self, id: &str) -> Option<&SectorDefinition> {
        self.sectors.iter().find(|sector| sector.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectorDefinition> {
        self.sectors.iter()
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

// Object style note:
// Everything in here is plain data. Feed sources and sectors are loaded once
// at startup and never mutated; news items are produced fresh by every
// aggregation cycle and replaced wholesale by the next one.
