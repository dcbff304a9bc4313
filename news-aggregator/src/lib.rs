pub mod types;
pub mod traits;
pub mod utils;
pub mod keywords;
pub mod fetcher;
pub mod parser;
pub mod classifier;
pub mod priority;
pub mod tags;
pub mod dedup;
pub mod processing;
pub mod feed_manager;
pub mod aggregator;

pub use types::*;
pub use traits::{FetchFeed, SourceConfigProvider};
pub use keywords::{KeywordTables, LocalBoost};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use classifier::Classifier;
pub use priority::PriorityScorer;
pub use tags::TagExtractor;
pub use dedup::Deduplicator;
pub use processing::{ItemProcessor, ProcessingStage};
pub use feed_manager::FeedManager;
pub use aggregator::NewsAggregator;
