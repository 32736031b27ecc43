use crate::types::{Batch, FeedError, Result, Story};
use async_trait::async_trait;

/// Trait for pulling one batch at a time from an upstream source.
///
/// An adapter owns its own cursor (id-list offset, continuation token, or
/// fetched-once flag) as private state, so a fresh adapter is a fully reset
/// cursor. Implementations must leave that state untouched when a fetch
/// fails, keeping the batch retryable.
#[async_trait]
pub trait SourceAdapter: Send {
    /// Fetch the next batch of stories, in upstream order.
    ///
    /// Exhaustion is reported through `Batch::exhausted`, never as an
    /// error. A batch may be both non-empty and exhausted (the source
    /// returned its final page).
    async fn fetch_next_batch(&mut self) -> Result<Batch>;
}

/// Transport over which adapters reach the upstream APIs.
///
/// Transport failure and non-2xx statuses surface as network-class errors;
/// an undecodable body is a parse error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value>;
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// The external consumer of delivered stories.
///
/// `render` is called once per story with a position index that strictly
/// increases and never repeats within a session. Sink failures are not the
/// core's concern, so all methods are infallible.
pub trait Sink: Send + Sync {
    fn render(&self, story: &Story, position: usize);
    fn on_exhausted(&self);
    fn on_error(&self, err: &FeedError);
}
