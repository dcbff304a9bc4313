use crate::dedup::Deduplicator;
use crate::fetcher::{fetch_or_warn, Fetcher};
use crate::keywords::KeywordTables;
use crate::parser::FeedParser;
use crate::processing::{
    DeduplicationStage, ItemProcessor, PriorityFilterStage, ProcessingStage, RankingStage,
};
use crate::traits::{FetchFeed, SourceConfigProvider};
use crate::types::{
    AggregationRequest, AggregationResult, FeedSourceConfig, FetchConfig, NewsItem, Result,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Runs one aggregation pass per call: load sources, fetch and parse them
/// concurrently, then deduplicate, rank and truncate the merged items.
///
/// Holds no per-run state; every call starts from fresh configuration.
pub struct NewsAggregator {
    provider: Arc<dyn SourceConfigProvider>,
    fetcher: Arc<dyn FetchFeed>,
    parser: FeedParser,
    processor: ItemProcessor,
    deduplicator: Deduplicator,
    fetch_timeout: Duration,
}

impl NewsAggregator {
    pub fn new(
        provider: Arc<dyn SourceConfigProvider>,
        fetcher: Arc<dyn FetchFeed>,
        tables: Arc<KeywordTables>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            fetcher,
            parser: FeedParser::default(),
            processor: ItemProcessor::new(tables),
            deduplicator: Deduplicator::default(),
            fetch_timeout,
        }
    }

    /// Aggregator backed by the HTTP [`Fetcher`].
    pub fn with_http(
        provider: Arc<dyn SourceConfigProvider>,
        fetch_config: FetchConfig,
        tables: Arc<KeywordTables>,
    ) -> Result<Self> {
        let fetch_timeout = Duration::from_secs(fetch_config.timeout_seconds);
        let fetcher = Fetcher::new(fetch_config)?;
        Ok(Self::new(provider, Arc::new(fetcher), tables, fetch_timeout))
    }

    pub fn with_parser(mut self, parser: FeedParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_deduplicator(mut self, deduplicator: Deduplicator) -> Self {
        self.deduplicator = deduplicator;
        self
    }

    pub async fn get_latest_news(&self, request: &AggregationRequest) -> AggregationResult {
        self.get_latest_news_at(request, Utc::now()).await
    }

    /// Same as [`get_latest_news`](Self::get_latest_news) with an explicit
    /// reference time for the freshness window.
    pub async fn get_latest_news_at(
        &self,
        request: &AggregationRequest,
        now: DateTime<Utc>,
    ) -> AggregationResult {
        let channel = request.channel.as_str();
        info!("Collecting news for channel: {}", channel);

        let configs = match self.provider.load_sources(channel).await {
            Ok(configs) => configs,
            Err(e) => {
                error!(channel, "Failed to load feed configurations: {}", e);
                return AggregationResult::missing_configuration(channel);
            }
        };

        if configs.is_empty() {
            error!(channel, "No feed configurations found for channel");
            return AggregationResult::missing_configuration(channel);
        }

        let selected: Vec<FeedSourceConfig> = configs
            .into_iter()
            .filter(|config| request.admits(config))
            .collect();
        info!("Using {} feed configurations", selected.len());

        // Results come back in configuration order regardless of completion order
        let reports = join_all(
            selected
                .iter()
                .map(|config| self.collect_source(config, request.local_boost, now)),
        )
        .await;

        let failed_sources = reports.iter().filter(|r| r.is_none()).count();
        let all_items: Vec<NewsItem> = reports.into_iter().flatten().flatten().collect();
        let total = all_items.len();

        let items = self
            .stages(request)
            .iter()
            .fold(all_items, |items, stage| {
                let processed = stage.process(items);
                debug!("Stage {} -> {} items", stage.stage_name(), processed.len());
                processed
            });

        info!(
            "Collected {} unique news items (from {} total, {} of {} sources failed)",
            items.len(),
            total,
            failed_sources,
            selected.len()
        );

        AggregationResult::completed(channel, items)
    }

    fn stages(&self, request: &AggregationRequest) -> Vec<Box<dyn ProcessingStage>> {
        let mut stages: Vec<Box<dyn ProcessingStage>> = vec![Box::new(DeduplicationStage::new(
            self.deduplicator.clone(),
        ))];
        if let Some(min_priority) = request.min_priority {
            stages.push(Box::new(PriorityFilterStage::new(min_priority)));
        }
        stages.push(Box::new(RankingStage::new(request.max_items)));
        stages
    }

    /// Fetch, parse and enrich one source. `None` marks a failed source; the
    /// failure has already been logged.
    async fn collect_source(
        &self,
        source: &FeedSourceConfig,
        local_boost: bool,
        now: DateTime<Utc>,
    ) -> Option<Vec<NewsItem>> {
        if !source.weight.is_finite() {
            warn!(
                source = %source.source_name,
                weight = source.weight,
                "Non-finite source weight; its items rank last"
            );
        }

        let content = fetch_or_warn(self.fetcher.as_ref(), source, self.fetch_timeout).await?;

        match self.parser.parse_feed(&content, source, now) {
            Ok(entries) => Some(
                entries
                    .into_iter()
                    .map(|entry| self.processor.process(entry, source, local_boost))
                    .collect(),
            ),
            Err(e) => {
                warn!(
                    source = %source.source_name,
                    url = %source.feed_url,
                    kind = e.kind(),
                    "Malformed feed content: {}",
                    e
                );
                None
            }
        }
    }
}
