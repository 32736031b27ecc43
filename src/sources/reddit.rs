use crate::traits::{SourceAdapter, Transport};
use crate::types::{Batch, FeedError, Result, Story};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub const REDDIT_API: &str = "https://www.reddit.com";

/// Listing page size requested from the hot endpoint.
const PAGE_LIMIT: usize = 15;

#[derive(Debug, Deserialize)]
pub struct RedditListing {
    pub data: RedditListingData,
}

#[derive(Debug, Deserialize)]
pub struct RedditListingData {
    pub after: Option<String>,
    #[serde(default)]
    pub children: Vec<RedditChild>,
}

#[derive(Debug, Deserialize)]
pub struct RedditChild {
    pub data: RedditPost,
}

#[derive(Debug, Deserialize)]
pub struct RedditPost {
    #[serde(default)]
    pub stickied: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub id: String,
}

/// A subreddit hot listing, paged with the opaque `after` token the
/// listing envelope hands back.
pub struct RedditSource {
    transport: Arc<dyn Transport>,
    /// Listing path, e.g. `r/science`.
    path: String,
    after: Option<String>,
    /// An absent `after` is ambiguous between "first page" and "done", so
    /// exhaustion is remembered separately.
    done: bool,
}

impl RedditSource {
    pub fn new(transport: Arc<dyn Transport>, path: String) -> Self {
        Self {
            transport,
            path,
            after: None,
            done: false,
        }
    }
}

#[async_trait]
impl SourceAdapter for RedditSource {
    async fn fetch_next_batch(&mut self) -> Result<Batch> {
        if self.done {
            return Ok(Batch::exhausted());
        }

        let mut url = format!("{REDDIT_API}/{}/hot.json?limit={PAGE_LIMIT}", self.path);
        if let Some(after) = &self.after {
            url.push_str("&after=");
            url.push_str(after);
        }

        let value = self.transport.fetch_json(&url).await?;
        let listing: RedditListing =
            serde_json::from_value(value).map_err(|e| FeedError::parse(&url, e))?;

        // Store the next-page token whether present or absent; an absent
        // token ends the category, but this page's items still go out.
        self.after = listing.data.after;
        if self.after.is_none() {
            self.done = true;
        }
        let exhausted = self.done;

        let stories: Vec<Story> = listing
            .data
            .children
            .into_iter()
            .filter(|child| !child.data.stickied)
            .map(|child| normalize(child.data))
            .collect();

        debug!(
            path = %self.path,
            count = stories.len(),
            exhausted,
            "fetched listing page"
        );

        Ok(Batch { stories, exhausted })
    }
}

/// Map a listing post into the canonical story shape. The domain comes
/// straight from the payload; no derivation.
pub fn normalize(post: RedditPost) -> Story {
    Story {
        id: post.id,
        title: post.title,
        url: post.url,
        score: post.score.max(0) as u32,
        author: post.author,
        time: post.created_utc as i64,
        domain: post.domain,
        comments_url: format!("{REDDIT_API}{}", post.permalink),
    }
}
