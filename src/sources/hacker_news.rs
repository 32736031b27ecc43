use super::domain_label;
use crate::traits::{SourceAdapter, Transport};
use crate::types::{Batch, FeedError, Result, Story};
use async_trait::async_trait;
use futures::future;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const HN_API: &str = "https://hacker-news.firebaseio.com/v0";
pub const HN_ITEM_PAGE: &str = "https://news.ycombinator.com/item?id=";

/// How many item details are resolved per batch.
const BATCH_SIZE: usize = 12;

/// Raw item payload from `/v0/item/{id}.json`. Absent fields default so a
/// sparse item still normalizes cleanly.
#[derive(Debug, Deserialize)]
pub struct HnItem {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub time: i64,
}

/// Hacker News top stories, paged by offset into a ranked id list.
///
/// The id list is fetched once on the first batch and never refetched for
/// the life of the adapter; the offset into it is the cursor.
pub struct HackerNewsSource {
    transport: Arc<dyn Transport>,
    ids: Vec<u64>,
    index: usize,
    ids_fetched: bool,
}

impl HackerNewsSource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            ids: Vec::new(),
            index: 0,
            ids_fetched: false,
        }
    }

    async fn fetch_item(&self, id: u64) -> Result<Option<Story>> {
        let url = format!("{HN_API}/item/{id}.json");
        let value = self.transport.fetch_json(&url).await?;
        if value.is_null() {
            return Ok(None);
        }
        let item: HnItem =
            serde_json::from_value(value).map_err(|e| FeedError::parse(&url, e))?;
        Ok(Some(normalize(item)))
    }
}

#[async_trait]
impl SourceAdapter for HackerNewsSource {
    async fn fetch_next_batch(&mut self) -> Result<Batch> {
        if !self.ids_fetched {
            let url = format!("{HN_API}/topstories.json");
            let value = self.transport.fetch_json(&url).await?;
            self.ids = serde_json::from_value(value).map_err(|e| FeedError::parse(&url, e))?;
            self.ids_fetched = true;
            debug!("fetched {} ranked story ids", self.ids.len());
        }

        let end = (self.index + BATCH_SIZE).min(self.ids.len());
        let slice: Vec<u64> = self.ids[self.index..end].to_vec();
        if slice.is_empty() {
            return Ok(Batch::exhausted());
        }

        // Claim the slice before any detail fetch resolves, so a duplicate
        // call that slips past the in-flight gate cannot re-claim it.
        self.index = end;

        let this: &Self = self;
        let details = future::join_all(slice.iter().map(|&id| this.fetch_item(id))).await;

        let stories = details
            .into_iter()
            .zip(&slice)
            .filter_map(|(result, &id)| match result {
                Ok(Some(story)) => Some(story),
                Ok(None) => {
                    debug!(id, "skipping empty item");
                    None
                }
                // A failed detail fetch drops that item only; the batch
                // still counts as progress.
                Err(err) => {
                    warn!(id, error = %err, "dropping item that failed to fetch");
                    None
                }
            })
            .collect();

        Ok(Batch {
            stories,
            exhausted: false,
        })
    }
}

/// Map a raw item into the canonical story shape. Items without an external
/// link point at their own discussion page and get the "Self" domain.
pub fn normalize(item: HnItem) -> Story {
    let comments_url = format!("{HN_ITEM_PAGE}{}", item.id);
    let url = item.url.clone().unwrap_or_else(|| comments_url.clone());

    Story {
        id: item.id.to_string(),
        title: item.title,
        domain: domain_label(item.url.as_deref()),
        url,
        score: item.score.max(0) as u32,
        author: item.by,
        time: item.time,
        comments_url,
    }
}
