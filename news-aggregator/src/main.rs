use anyhow::Context;
use clap::Parser;
use news_aggregator::{AggregationRequest, FeedManager, FetchConfig, KeywordTables, NewsAggregator};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Aggregate the latest news of one channel and print them as JSON.
#[derive(Debug, Parser)]
#[command(name = "news-aggregator", version)]
struct Args {
    /// TOML file with `[[sources]]` feed configurations
    #[arg(long, default_value = "config/sources.toml")]
    sources: PathBuf,

    /// Channel to aggregate
    #[arg(long, default_value = "zurich")]
    channel: String,

    #[arg(long, default_value_t = news_aggregator::DEFAULT_MAX_ITEMS)]
    max_items: usize,

    /// Only use these source names (repeatable)
    #[arg(long = "source")]
    source_filter: Vec<String>,

    /// Only use feeds declaring these categories (repeatable)
    #[arg(long = "category")]
    category_filter: Vec<String>,

    #[arg(long)]
    min_priority: Option<u8>,

    /// Boost items mentioning the local area and file them as local news
    #[arg(long)]
    local_boost: bool,

    /// TOML file with alternate keyword tables
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Per-source fetch timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting news aggregator for channel {}", args.channel);

    let manager = FeedManager::from_toml_file(&args.sources)
        .with_context(|| format!("loading feed sources from {}", args.sources.display()))?;
    let known_channels = manager.channels();

    let tables = match &args.tables {
        Some(path) => KeywordTables::load_from_file(path)
            .with_context(|| format!("loading keyword tables from {}", path.display()))?,
        None => KeywordTables::default(),
    };

    let fetch_config = FetchConfig {
        timeout_seconds: args.timeout,
        ..FetchConfig::default()
    };
    let aggregator = NewsAggregator::with_http(Arc::new(manager), fetch_config, Arc::new(tables))?;

    let mut request = AggregationRequest::new(args.channel)
        .with_max_items(args.max_items)
        .with_sources(args.source_filter)
        .with_categories(args.category_filter);
    if let Some(min_priority) = args.min_priority {
        request = request.with_min_priority(min_priority);
    }
    if args.local_boost {
        request = request.with_local_boost();
    }

    let result = aggregator.get_latest_news(&request).await;
    println!("{}", serde_json::to_string_pretty(&result.items)?);

    if result.is_configuration_error() {
        error!(
            "Channel '{}' has no feed configuration (known channels: {})",
            result.channel,
            known_channels.join(", ")
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
