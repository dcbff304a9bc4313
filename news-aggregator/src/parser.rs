use crate::types::{AggregatorError, FeedSourceConfig, ParseConfig, ParsedEntry, Result};
use crate::utils::text::{clean_plain_text, extract_text_from_html, truncate_chars};
use chrono::{DateTime, Duration, Utc};
use feed_rs::parser;
use tracing::{debug, info};

/// Turns raw syndication content into fresh, normalized candidate entries.
#[derive(Debug, Clone, Default)]
pub struct FeedParser {
    config: ParseConfig,
}

impl FeedParser {
    pub fn new(config: ParseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Parse `content` fetched for `source`.
    ///
    /// Only the first `max_entries` entries of the document are considered;
    /// of those, entries published at or before `now - freshness_hours` are
    /// dropped. Entries keep document order.
    pub fn parse_feed(
        &self,
        content: &str,
        source: &FeedSourceConfig,
        now: DateTime<Utc>,
    ) -> Result<Vec<ParsedEntry>> {
        debug!(
            "Parsing feed content for {} ({} bytes)",
            source.source_name,
            content.len()
        );

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let cutoff = now - Duration::hours(self.config.freshness_hours);
        let mut entries = Vec::new();

        for entry in feed.entries.into_iter().take(self.config.max_entries) {
            if let Some(parsed_entry) = self.parse_entry(entry, now, cutoff) {
                entries.push(parsed_entry);
            }
        }

        info!(
            "Parsed {} fresh entries from {} ({})",
            entries.len(),
            source.source_name,
            source.feed_category
        );
        Ok(entries)
    }

    fn parse_entry(
        &self,
        entry: feed_rs::model::Entry,
        now: DateTime<Utc>,
        cutoff: DateTime<Utc>,
    ) -> Option<ParsedEntry> {
        let title = entry
            .title
            .map(|t| clean_plain_text(&t.content))
            .unwrap_or_default();
        if title.is_empty() {
            debug!("Skipping entry without title: {}", entry.id);
            return None;
        }

        // Missing or unparsable dates count as "just published"
        let published = entry
            .published
            .or(entry.updated)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now)
            .min(now);

        if published <= cutoff {
            debug!("Skipping stale entry '{}' ({})", title, published);
            return None;
        }

        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default();

        let body = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body))
            .map(|html| extract_text_from_html(&html))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| title.clone());
        let summary = truncate_chars(&body, self.config.summary_max_chars);

        Some(ParsedEntry {
            title,
            summary,
            link,
            published,
        })
    }
}
