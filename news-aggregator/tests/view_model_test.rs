mod common;

use chrono::Duration;
use common::*;
use news_aggregator::config::default_sectors;
use news_aggregator::utils::time::{format_time_ago, DATE_PLACEHOLDER};
use news_aggregator::view::build_view;
use news_aggregator::{
    Aggregator, FeedSource, FilterAction, FilterEngine, FilterState, NewsItem, NewsViewModel, Surface, ViewStatus,
};
use std::sync::Arc;

fn many_items(count: usize) -> Vec<NewsItem> {
    (0..count)
        // Zero-padded so every title keeps a distinct significant word.
        .map(|i| item(&format!("Headline {:04} about markets", i), i as i64))
        .collect()
}

fn view_model(client: Arc<ScriptedFeedClient>, sources: Vec<FeedSource>) -> NewsViewModel {
    NewsViewModel::new(Aggregator::new(client), sources, FilterEngine::new(default_sectors()))
}

#[tokio::test]
async fn test_summary_surface_caps_records_but_reports_full_count() {
    init_tracing();

    let cnbc = source("cnbc", "CNBC");
    let client = Arc::new(ScriptedFeedClient::new().with_items(&cnbc, many_items(45)));
    let mut model = view_model(client, vec![cnbc]);
    model.load_news().await;

    let summary = model.current_view_at(Surface::Summary, fixed_now());
    assert_eq!(summary.records.len(), 30);
    assert_eq!(summary.total_count, 45);
    assert_eq!(summary.count_label(), "45 articles");
    assert_eq!(summary.status, ViewStatus::Ready);

    let full = model.current_view_at(Surface::Full, fixed_now());
    assert_eq!(full.records.len(), 45);
    assert_eq!(full.total_count, 45);
    assert_eq!(full.records[..30], summary.records[..]);
}

#[tokio::test]
async fn test_total_failure_differs_from_no_matches() {
    init_tracing();

    let cnbc = source("cnbc", "CNBC");

    let failing = Arc::new(ScriptedFeedClient::new().with_failure(&cnbc));
    let mut failed_model = view_model(failing, vec![cnbc.clone()]);
    failed_model.load_news().await;

    let failed_view = failed_model.current_view_at(Surface::Full, fixed_now());
    assert_eq!(failed_view.status, ViewStatus::Unavailable);
    assert!(failed_view.records.is_empty());

    let working = Arc::new(ScriptedFeedClient::new().with_items(&cnbc, vec![item("Retail sales beat forecasts", 3)]));
    let mut filtered_model = view_model(working, vec![cnbc]);
    filtered_model.load_news().await;
    filtered_model.dispatch(FilterAction::SetQuery("no headline says this".to_string()));

    for surface in [Surface::Full, Surface::Summary] {
        let view = filtered_model.current_view_at(surface, fixed_now());
        assert_eq!(view.status, ViewStatus::NoMatches);
        assert_eq!(view.total_count, 0);
        assert_eq!(view.count_label(), "0 articles");
    }
    assert_ne!(ViewStatus::NoMatches.message(), ViewStatus::Unavailable.message());
}

#[tokio::test]
async fn test_no_sources_configured_is_unavailable() {
    init_tracing();

    let mut model = view_model(Arc::new(ScriptedFeedClient::new()), Vec::new());
    model.load_news().await;

    assert_eq!(model.status(), ViewStatus::Unavailable);
}

#[tokio::test]
async fn test_filter_changes_do_not_refetch() {
    init_tracing();

    let cnbc = source("cnbc", "CNBC");
    let client = Arc::new(ScriptedFeedClient::new().with_items(
        &cnbc,
        vec![
            item_with_description("Crude slides on demand worries", "Oil demand outlook cut", 1),
            item_with_description("Pfizer wins FDA nod", "Drug approval expands market", 2),
            item("Bank earnings top estimates", 3),
        ],
    ));
    let mut model = view_model(client.clone(), vec![cnbc]);
    model.load_news().await;
    assert_eq!(client.calls(), 1);

    assert!(model.dispatch(FilterAction::SelectSector("energy".to_string())));
    assert_eq!(model.current_view_at(Surface::Full, fixed_now()).total_count, 1);

    assert!(model.dispatch(FilterAction::SelectSector("healthcare".to_string())));
    let view = model.current_view_at(Surface::Full, fixed_now());
    assert_eq!(view.records[0].title, "Pfizer wins FDA nod");

    assert!(model.dispatch(FilterAction::ClearSector));
    assert!(model.dispatch(FilterAction::SetQuery("bank".to_string())));
    assert_eq!(model.current_view_at(Surface::Full, fixed_now()).total_count, 1);

    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_selecting_active_sector_again_clears_it() {
    init_tracing();

    let cnbc = source("cnbc", "CNBC");
    let client = Arc::new(ScriptedFeedClient::new().with_items(
        &cnbc,
        vec![item("Exxon raises dividend", 1), item("Disney parks attendance dips", 2)],
    ));
    let mut model = view_model(client, vec![cnbc]);
    model.load_news().await;

    model.dispatch(FilterAction::SelectSector("energy".to_string()));
    assert_eq!(model.current_view_at(Surface::Full, fixed_now()).total_count, 1);

    model.dispatch(FilterAction::SelectSector("energy".to_string()));
    assert_eq!(model.filter_state().active_sector(), None);
    assert_eq!(model.current_view_at(Surface::Full, fixed_now()).total_count, 2);
}

#[tokio::test]
async fn test_unknown_sector_is_ignored() {
    init_tracing();

    let cnbc = source("cnbc", "CNBC");
    let client = Arc::new(ScriptedFeedClient::new().with_items(&cnbc, vec![item("Exxon raises dividend", 1)]));
    let mut model = view_model(client, vec![cnbc]);
    model.load_news().await;

    assert!(!model.dispatch(FilterAction::SelectSector("crypto".to_string())));
    assert_eq!(model.filter_state().active_sector(), None);
    assert_eq!(model.status(), ViewStatus::Ready);
}

#[tokio::test]
async fn test_injected_filter_state_applies_on_first_load() {
    init_tracing();

    let cnbc = source("cnbc", "CNBC");
    let client = Arc::new(ScriptedFeedClient::new().with_items(
        &cnbc,
        vec![item("Housing starts jump", 1), item("Copper rallies on supply fears", 2)],
    ));

    let mut filter = FilterState::new();
    filter.apply(FilterAction::SelectSector("materials".to_string()));
    let mut model = view_model(client, vec![cnbc]).with_filter_state(filter);

    assert_eq!(model.status(), ViewStatus::Loading);
    model.load_news().await;

    let view = model.current_view_at(Surface::Summary, fixed_now());
    assert_eq!(view.total_count, 1);
    assert_eq!(view.records[0].title, "Copper rallies on supply fears");
    assert_eq!(view.records[0].source, "CNBC");
}

#[tokio::test]
async fn test_sync_picks_up_cycle_run_elsewhere() {
    init_tracing();

    let cnbc = source("cnbc", "CNBC");
    let client = Arc::new(ScriptedFeedClient::new().with_items(&cnbc, vec![item("Walmart sales climb", 1)]));
    let aggregator = Aggregator::new(client);
    let mut model = NewsViewModel::new(aggregator.clone(), vec![cnbc.clone()], FilterEngine::new(default_sectors()));

    assert!(!model.sync_with_aggregator().await);
    aggregator.load_all(&[cnbc]).await;
    assert!(model.sync_with_aggregator().await);
    assert_eq!(model.current_view_at(Surface::Full, fixed_now()).total_count, 1);
}

#[tokio::test]
async fn test_abandoned_load_keeps_previous_state() {
    init_tracing();

    let cnbc = source("cnbc", "CNBC");
    let client = Arc::new(ScriptedFeedClient::new().with_delayed_items(
        &cnbc,
        std::time::Duration::from_millis(300),
        vec![item("Oil prices steady", 1)],
    ));
    let mut model = view_model(client, vec![cnbc]);

    // Dropping the load future mid-flight, as the refresh loop does on Ctrl-C.
    let abandoned = tokio::time::timeout(std::time::Duration::from_millis(50), model.load_news()).await;
    assert!(abandoned.is_err());
    assert_eq!(model.status(), ViewStatus::Loading);
    assert!(model.collection().is_none());

    let outcome = model.load_news().await;
    assert!(outcome.collection().is_some());
    assert_eq!(model.current_view_at(Surface::Full, fixed_now()).total_count, 1);
}

#[test]
fn test_time_ago_boundaries() {
    let now = fixed_now();

    assert_eq!(format_time_ago(Some(now - Duration::seconds(45)), now), "Just now");
    assert_eq!(format_time_ago(Some(now - Duration::minutes(59)), now), "59m ago");
    assert_eq!(format_time_ago(Some(now - Duration::minutes(90)), now), "1h ago");
    assert_eq!(format_time_ago(Some(now - Duration::hours(23) - Duration::minutes(59)), now), "23h ago");
    assert_eq!(format_time_ago(Some(now - Duration::days(3)), now), "3d ago");
    assert_eq!(format_time_ago(Some(now - Duration::days(9)), now), "Oct 6");
    assert_eq!(format_time_ago(Some(now + Duration::minutes(5)), now), "Just now");
    assert_eq!(format_time_ago(None, now), DATE_PLACEHOLDER);
}

#[test]
fn test_build_view_renders_placeholder_for_undated_items() {
    let items = vec![undated_item("Undated wire story").with_source("CNBC")];
    let view = build_view(&items, ViewStatus::Ready, Surface::Full, 30, fixed_now());

    assert_eq!(view.records[0].time_ago, DATE_PLACEHOLDER);
    assert_eq!(view.records[0].source, "CNBC");
    assert!(view.records[0].published_at.is_none());
}
