#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use news_aggregator::{AggregatorError, FeedSourceConfig, FetchFeed, Result};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use uuid::Uuid;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Formatted log output captured for the current thread.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()
    }

    /// Lines logged at `level` ("WARN", "ERROR", ...).
    pub fn at_level(&self, level: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.trim_start().starts_with(level))
            .collect()
    }
}

pub struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter(self.0.clone())
    }
}

/// Route this thread's log output into a buffer until the guard drops.
/// `#[tokio::test]` runs on a current-thread runtime, so the whole test is covered.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(logs.clone())
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}

/// Fixed reference time for freshness checks
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    fixed_now() - Duration::hours(hours)
}

pub fn source(name: &str, feed_category: &str, priority: i32, weight: f64) -> FeedSourceConfig {
    FeedSourceConfig {
        id: Uuid::new_v4(),
        channel: "zurich".to_string(),
        source_name: name.to_string(),
        feed_category: feed_category.to_string(),
        feed_url: format!("https://feeds.example.test/{}.xml", name),
        priority,
        weight,
        is_active: true,
        description: None,
    }
}

/// One RSS `<item>`; `published` of `None` omits `<pubDate>`.
pub fn rss_item(title: &str, description: Option<&str>, published: Option<DateTime<Utc>>) -> String {
    let mut item = format!(
        "<item><title>{}</title><link>https://news.example.test/{}</link>",
        title,
        title.len()
    );
    if let Some(description) = description {
        item.push_str(&format!("<description><![CDATA[{}]]></description>", description));
    }
    if let Some(published) = published {
        item.push_str(&format!("<pubDate>{}</pubDate>", published.to_rfc2822()));
    }
    item.push_str("</item>");
    item
}

pub fn rss_feed(items: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <link>https://news.example.test</link>
    <description>Fixture feed</description>
    {}
  </channel>
</rss>"#,
        items.join("\n    ")
    )
}

/// Feed with one fresh item per title, published one hour apart.
pub fn fresh_feed(titles: &[&str]) -> String {
    let items: Vec<String> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| rss_item(title, None, Some(hours_ago(i as i64 + 1))))
        .collect();
    rss_feed(&items)
}

#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Status(u16),
    /// Never answers within any sensible timeout
    Hang,
}

/// Scripted fetcher keyed by feed URL. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeFetcher {
    replies: HashMap<String, Reply>,
    requested: Mutex<Vec<String>>,
    finished: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, source: &FeedSourceConfig, reply: Reply) -> Self {
        self.replies.insert(source.feed_url.clone(), reply);
        self
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn finished_count(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FetchFeed for FakeFetcher {
    async fn fetch_feed(&self, source: &FeedSourceConfig) -> Result<String> {
        self.requested.lock().unwrap().push(source.feed_url.clone());
        let reply = self
            .replies
            .get(&source.feed_url)
            .cloned()
            .unwrap_or(Reply::Status(404));

        let outcome = match reply {
            Reply::Body(body) => Ok(body),
            Reply::Status(status) => Err(AggregatorError::HttpStatus { status }),
            Reply::Hang => {
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        };
        self.finished.fetch_add(1, Ordering::SeqCst);
        outcome
    }
}
