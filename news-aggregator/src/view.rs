use crate::aggregator::Aggregator;
use crate::filter::FilterEngine;
use crate::types::{CycleOutcome, FeedSource, FilterAction, FilterState, NewsCollection, NewsItem};
use crate::utils::time::format_time_ago;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_SUMMARY_LIMIT: usize = 30;

/// Display context consuming the filtered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Every filtered item.
    Full,
    /// The newest items up to the summary limit.
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    /// No aggregation cycle has completed yet.
    Loading,
    Ready,
    /// Items were loaded but none pass the current filters.
    NoMatches,
    /// Every source failed in the latest cycle.
    Unavailable,
}

impl ViewStatus {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ViewStatus::Loading => Some("Loading news..."),
            ViewStatus::Ready => None,
            ViewStatus::NoMatches => Some("No news items match your current filters."),
            ViewStatus::Unavailable => Some("Unable to load news. Please try again later."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord {
    pub title: String,
    pub link: String,
    pub source: String,
    pub time_ago: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsView {
    pub surface: Surface,
    pub status: ViewStatus,
    /// Size of the whole filtered set, even when `records` is capped.
    pub total_count: usize,
    pub records: Vec<DisplayRecord>,
}

impl NewsView {
    pub fn count_label(&self) -> String {
        format!("{} articles", self.total_count)
    }
}

/// Render-agnostic view of already filtered items.
pub fn build_view(
    items: &[NewsItem],
    status: ViewStatus,
    surface: Surface,
    summary_limit: usize,
    now: DateTime<Utc>,
) -> NewsView {
    let shown = match surface {
        Surface::Full => items.len(),
        Surface::Summary => items.len().min(summary_limit),
    };

    let records = items[..shown]
        .iter()
        .map(|item| DisplayRecord {
            title: item.title.clone(),
            link: item.link.clone(),
            source: item.source.clone(),
            time_ago: format_time_ago(item.published_at, now),
            published_at: item.published_at,
        })
        .collect();

    NewsView {
        surface,
        status,
        total_count: items.len(),
        records,
    }
}

/// Couples the aggregator with a filter state and serves views to the
/// display surfaces. Filter changes recompute the visible set from the
/// current collection; only `load_news` goes to the network.
pub struct NewsViewModel {
    aggregator: Aggregator,
    sources: Vec<FeedSource>,
    filter_engine: FilterEngine,
    filter: FilterState,
    summary_limit: usize,
    collection: Option<Arc<NewsCollection>>,
    visible: Vec<NewsItem>,
}

impl NewsViewModel {
    pub fn new(aggregator: Aggregator, sources: Vec<FeedSource>, filter_engine: FilterEngine) -> Self {
        Self {
            aggregator,
            sources,
            filter_engine,
            filter: FilterState::new(),
            summary_limit: DEFAULT_SUMMARY_LIMIT,
            collection: None,
            visible: Vec::new(),
        }
    }

    pub fn with_summary_limit(mut self, summary_limit: usize) -> Self {
        self.summary_limit = summary_limit;
        self
    }

    pub fn with_filter_state(mut self, filter: FilterState) -> Self {
        self.filter = filter;
        self.recompute();
        self
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn filter_engine(&self) -> &FilterEngine {
        &self.filter_engine
    }

    pub fn collection(&self) -> Option<&Arc<NewsCollection>> {
        self.collection.as_ref()
    }

    /// Run one aggregation cycle and adopt its collection if it completed.
    pub async fn load_news(&mut self) -> CycleOutcome {
        let outcome = self.aggregator.load_all(&self.sources).await;
        if let CycleOutcome::Completed(collection) = &outcome {
            self.adopt(collection.clone());
        }
        outcome
    }

    /// Pick up a collection committed by someone else sharing the aggregator.
    /// Returns true when a newer collection was adopted.
    pub async fn sync_with_aggregator(&mut self) -> bool {
        let latest = self.aggregator.current().await;
        let newer = match &self.collection {
            Some(current) => latest.generation > current.generation,
            None => latest.generation > 0,
        };
        if newer {
            self.adopt(latest);
        }
        newer
    }

    /// Apply a filter mutation. Unknown sectors are ignored.
    pub fn dispatch(&mut self, action: FilterAction) -> bool {
        if let FilterAction::SelectSector(sector) = &action {
            if !self.filter_engine.sectors().contains(sector) {
                warn!("Ignoring unknown sector '{}'", sector);
                return false;
            }
        }

        let changed = self.filter.apply(action);
        if changed {
            self.recompute();
        }
        changed
    }

    pub fn status(&self) -> ViewStatus {
        match &self.collection {
            None => ViewStatus::Loading,
            Some(collection) if collection.all_sources_failed() => ViewStatus::Unavailable,
            Some(_) if self.visible.is_empty() => ViewStatus::NoMatches,
            Some(_) => ViewStatus::Ready,
        }
    }

    pub fn current_view(&self, surface: Surface) -> NewsView {
        self.current_view_at(surface, Utc::now())
    }

    pub fn current_view_at(&self, surface: Surface, now: DateTime<Utc>) -> NewsView {
        build_view(&self.visible, self.status(), surface, self.summary_limit, now)
    }

    fn adopt(&mut self, collection: Arc<NewsCollection>) {
        self.collection = Some(collection);
        self.recompute();
    }

    fn recompute(&mut self) {
        let Some(collection) = &self.collection else {
            self.visible.clear();
            return;
        };

        self.visible = self
            .filter_engine
            .apply_state(&collection.items, &self.filter)
            .into_iter()
            .cloned()
            .collect();

        debug!(
            "Visible items: {} of {} (sector: {:?}, query: {:?})",
            self.visible.len(),
            collection.len(),
            self.filter.active_sector(),
            self.filter.search_query()
        );
    }
}
