pub mod defs;

pub use defs::{FeedSourceConfig, NewsItem};
