use anyhow::Context;
use clap::Parser;
use news_aggregator::{
    Aggregator, FeedClient, FilterAction, FilterEngine, FilterState, NewsView, NewsViewModel, ProxyFeedClient,
    PulseConfig, RssFeedClient, Surface,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "news-aggregator", about = "Aggregate market news feeds into a filtered headline list")]
struct Args {
    /// JSON configuration file (feeds, sectors, fetch settings)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only show headlines matching this sector's keywords
    #[arg(long)]
    sector: Option<String>,

    /// Only show headlines whose title contains this text
    #[arg(long, default_value = "")]
    query: String,

    #[arg(long, value_enum, default_value_t = Surface::Full)]
    surface: Surface,

    /// Fetch RSS/Atom directly instead of through the conversion endpoint
    #[arg(long)]
    direct: bool,

    /// Print the view as JSON
    #[arg(long)]
    json: bool,

    /// Reload every N seconds until interrupted
    #[arg(long, value_name = "SECONDS")]
    refresh: Option<u64>,

    /// Print the configured sectors and exit
    #[arg(long)]
    list_sectors: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    let config = PulseConfig::load(args.config.as_deref()).context("failed to load configuration")?;

    if args.list_sectors {
        for sector in config.sectors.iter() {
            println!("{:<14} {}", sector.id, sector.keywords.join(", "));
        }
        return Ok(());
    }

    let client: Arc<dyn FeedClient> = if args.direct {
        Arc::new(RssFeedClient::new(config.fetch.clone())?)
    } else {
        Arc::new(ProxyFeedClient::new(&config.proxy_url, config.fetch.clone())?)
    };
    let aggregator = Aggregator::new(client).with_source_timeout(config.source_timeout());

    let mut filter = FilterState::new();
    if let Some(sector) = args.sector.as_deref() {
        let sector = config.resolve_sector(sector).context("see --list-sectors")?;
        filter.apply(FilterAction::SelectSector(sector));
    }
    filter.apply(FilterAction::SetQuery(args.query));

    let mut model = NewsViewModel::new(aggregator, config.feeds.clone(), FilterEngine::new(config.sectors.clone()))
        .with_summary_limit(config.summary_limit)
        .with_filter_state(filter);

    info!("Loading news from {} feeds", config.feeds.len());

    match args.refresh {
        None => {
            model.load_news().await;
            print_view(&model.current_view(args.surface), args.json)?;
        }
        Some(seconds) => {
            let mut ticker = tokio::time::interval(Duration::from_secs(seconds.max(1)));
            let shutdown = tokio::signal::ctrl_c();
            tokio::pin!(shutdown);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = &mut shutdown => break,
                }

                // Dropping an in-flight cycle leaves the model on its last collection.
                let loaded = tokio::select! {
                    outcome = model.load_news() => Some(outcome),
                    _ = &mut shutdown => None,
                };
                if loaded.is_none() {
                    break;
                }
                print_view(&model.current_view(args.surface), args.json)?;
            }
            info!("Interrupted, stopping refresh loop");
        }
    }

    Ok(())
}

fn print_view(view: &NewsView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    println!("{}", view.count_label());
    if let Some(message) = view.status.message() {
        println!("{}", message);
        return Ok(());
    }

    for record in &view.records {
        println!("{}", record.title);
        println!("    {} | {} | {}", record.source, record.time_ago, record.link);
    }
    if view.records.len() < view.total_count {
        println!("... {} more", view.total_count - view.records.len());
    }
    Ok(())
}
