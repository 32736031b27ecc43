use super::domain_label;
use crate::traits::{SourceAdapter, Transport};
use crate::types::{Batch, FeedError, Result, Story};
use async_trait::async_trait;
use feed_rs::parser;
use std::sync::Arc;
use tracing::debug;

/// How many entries of a feed are delivered.
const FEED_LIMIT: usize = 25;

/// A plain syndication feed. No upstream pagination: the first batch is
/// the whole feed and the source is exhausted with it.
pub struct RssSource {
    transport: Arc<dyn Transport>,
    url: String,
    fetched: bool,
}

impl RssSource {
    pub fn new(transport: Arc<dyn Transport>, url: String) -> Self {
        Self {
            transport,
            url,
            fetched: false,
        }
    }
}

#[async_trait]
impl SourceAdapter for RssSource {
    async fn fetch_next_batch(&mut self) -> Result<Batch> {
        if self.fetched {
            return Ok(Batch::exhausted());
        }

        let body = self.transport.fetch_text(&self.url).await?;
        let feed = parser::parse(body.as_bytes()).map_err(|e| FeedError::parse(&self.url, e))?;

        // Marked only after a successful fetch and parse, so a failed
        // attempt stays retryable.
        self.fetched = true;

        let feed_title = feed
            .title
            .map(|t| t.content)
            .unwrap_or_else(|| "Unknown".to_string());

        let stories: Vec<Story> = feed
            .entries
            .into_iter()
            .take(FEED_LIMIT)
            .map(|entry| normalize(entry, &feed_title))
            .collect();

        debug!(url = %self.url, count = stories.len(), "parsed feed");

        Ok(Batch {
            stories,
            exhausted: true,
        })
    }
}

/// Map a feed entry into the canonical story shape. Feeds carry no scores
/// or discussion pages, so the score is zero and the comments link is the
/// entry link itself.
pub fn normalize(entry: feed_rs::model::Entry, feed_title: &str) -> Story {
    let link = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .unwrap_or_default();

    let author = entry
        .authors
        .first()
        .map(|person| person.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| feed_title.to_string());

    let time = entry
        .published
        .or(entry.updated)
        .map(|t| t.timestamp())
        .unwrap_or(0);

    let id = if entry.id.is_empty() {
        link.clone()
    } else {
        entry.id
    };

    Story {
        id,
        title: entry.title.map(|t| t.content).unwrap_or_default(),
        domain: domain_label(if link.is_empty() { None } else { Some(&link) }),
        url: link.clone(),
        score: 0,
        author,
        time,
        comments_url: link,
    }
}
