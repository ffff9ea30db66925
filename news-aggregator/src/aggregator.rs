use crate::traits::FeedClient;
use crate::types::{AggregatorError, CycleOutcome, FeedSource, FetchConfig, NewsCollection, NewsItem, Result};
use crate::utils::text::title_key;
use chrono::Utc;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Runs aggregation cycles and holds the collection of the latest one.
///
/// Cloning is cheap and clones share state, so a refresh task and an
/// interactive caller can drive the same aggregator. Starting a cycle
/// supersedes whichever cycle is still in flight.
#[derive(Clone)]
pub struct Aggregator {
    client: Arc<dyn FeedClient>,
    source_timeout: Duration,
    // Generation of the most recently started cycle.
    cycles: Arc<watch::Sender<u64>>,
    current: Arc<RwLock<Arc<NewsCollection>>>,
}

impl Aggregator {
    pub fn new(client: Arc<dyn FeedClient>) -> Self {
        let (cycles, _) = watch::channel(0);
        Self {
            client,
            source_timeout: FetchConfig::default().source_timeout(),
            cycles: Arc::new(cycles),
            current: Arc::new(RwLock::new(Arc::new(NewsCollection::empty()))),
        }
    }

    pub fn with_source_timeout(mut self, source_timeout: Duration) -> Self {
        self.source_timeout = source_timeout;
        self
    }

    pub fn source_timeout(&self) -> Duration {
        self.source_timeout
    }

    /// Collection committed by the latest completed cycle.
    pub async fn current(&self) -> Arc<NewsCollection> {
        self.current.read().await.clone()
    }

    /// Generation of the most recently started cycle, 0 before the first.
    pub fn latest_generation(&self) -> u64 {
        *self.cycles.borrow()
    }

    /// Fetch every source concurrently, wait for all of them to settle, then
    /// merge, sort and deduplicate. Failed sources are logged and skipped;
    /// the cycle itself never fails.
    pub async fn load_all(&self, sources: &[FeedSource]) -> CycleOutcome {
        let generation = self.begin_cycle();
        let cycle_id = Uuid::new_v4();
        info!(
            "Starting aggregation cycle {} (generation {}) over {} sources",
            cycle_id,
            generation,
            sources.len()
        );

        let fetches = join_all(sources.iter().map(|source| self.fetch_source(source)));
        let outcomes = tokio::select! {
            outcomes = fetches => outcomes,
            _ = wait_superseded(self.cycles.subscribe(), generation) => {
                info!("Cycle {} superseded before its fetches settled", cycle_id);
                return CycleOutcome::Superseded;
            }
        };

        let sources_failed = outcomes.iter().filter(|outcome| outcome.is_err()).count();
        let sources_ok = outcomes.len() - sources_failed;
        let items = merge_outcomes(sources, outcomes);

        let collection = Arc::new(NewsCollection {
            cycle_id,
            generation,
            loaded_at: Utc::now(),
            items,
            sources_ok,
            sources_failed,
        });

        let mut current = self.current.write().await;
        if *self.cycles.borrow() != generation {
            info!("Cycle {} finished after a newer cycle started, discarding", cycle_id);
            return CycleOutcome::Superseded;
        }
        *current = collection.clone();
        drop(current);

        if collection.all_sources_failed() {
            warn!("Cycle {}: no source could be loaded", cycle_id);
        } else {
            info!(
                "Cycle {}: {} items from {}/{} sources",
                cycle_id,
                collection.len(),
                sources_ok,
                sources.len()
            );
        }

        CycleOutcome::Completed(collection)
    }

    fn begin_cycle(&self) -> u64 {
        let mut generation = 0;
        self.cycles.send_modify(|latest| {
            *latest += 1;
            generation = *latest;
        });
        generation
    }

    async fn fetch_source(&self, source: &FeedSource) -> Result<Vec<NewsItem>> {
        match tokio::time::timeout(self.source_timeout, self.client.fetch(source)).await {
            Ok(Ok(items)) => {
                debug!("{} returned {} items via {}", source.name, items.len(), self.client.client_name());
                Ok(items)
            }
            Ok(Err(e)) => {
                warn!("Failed to fetch {} ({}): {}", source.name, source.url, e);
                Err(e)
            }
            Err(_) => {
                let e = AggregatorError::Timeout {
                    source_name: source.name.clone(),
                    timeout: self.source_timeout,
                };
                warn!("{}", e);
                Err(e)
            }
        }
    }
}

async fn wait_superseded(mut cycles: watch::Receiver<u64>, generation: u64) {
    loop {
        if *cycles.borrow_and_update() != generation {
            return;
        }
        if cycles.changed().await.is_err() {
            // Sender gone: nothing can supersede us any more.
            std::future::pending::<()>().await;
        }
    }
}

/// Tag, concatenate, sort and deduplicate the outcomes of one cycle.
/// `outcomes` is positional: entry `i` belongs to `sources[i]`.
pub fn merge_outcomes(sources: &[FeedSource], outcomes: Vec<Result<Vec<NewsItem>>>) -> Vec<NewsItem> {
    let mut items: Vec<NewsItem> = sources
        .iter()
        .zip(outcomes)
        .filter_map(|(source, outcome)| outcome.ok().map(|items| (source, items)))
        .flat_map(|(source, items)| items.into_iter().map(move |item| item.with_source(&source.name)))
        .collect();

    sort_by_recency(&mut items);
    deduplicate(items)
}

/// Newest first. Stable, so equal timestamps keep fetch order; undated items
/// go last.
pub fn sort_by_recency(items: &mut [NewsItem]) {
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Drop every item whose title key was already seen; the first occurrence wins.
pub fn deduplicate(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let before = items.len();
    let mut seen = HashSet::new();
    let unique: Vec<NewsItem> = items
        .into_iter()
        .filter(|item| seen.insert(title_key(&item.title)))
        .collect();

    let removed = before - unique.len();
    if removed > 0 {
        debug!("Removed {} duplicate headlines", removed);
    }
    unique
}
