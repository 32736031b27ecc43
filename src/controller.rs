use crate::registry::CategoryRegistry;
use crate::sources;
use crate::traits::{Sink, SourceAdapter, Transport};
use crate::types::{FeedSession, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Live per-category state. The adapter slot is empty exactly while a
/// fetch has it checked out.
struct ActiveSession {
    category: String,
    adapter: Option<Box<dyn SourceAdapter>>,
    exhausted: bool,
    fetch_in_flight: bool,
    delivered: usize,
}

struct ControllerState {
    session: Option<ActiveSession>,
    /// Bumped on every activation; a completing fetch whose captured
    /// generation no longer matches belongs to a superseded category and
    /// must not touch the current session.
    generation: u64,
}

/// Sequences batch fetches for the active category and hands ordered
/// batches to the sink.
///
/// At most one fetch is in flight per session; a `request_more` arriving
/// while one is outstanding is dropped, not queued. Each controller owns
/// its session outright, so independent controllers never share state.
pub struct FeedController {
    registry: CategoryRegistry,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn Sink>,
    state: Mutex<ControllerState>,
}

impl FeedController {
    pub fn new(
        registry: CategoryRegistry,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn Sink>,
    ) -> Self {
        Self {
            registry,
            transport,
            sink,
            state: Mutex::new(ControllerState {
                session: None,
                generation: 0,
            }),
        }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Snapshot of the active session, if any.
    pub async fn session(&self) -> Option<FeedSession> {
        let state = self.state.lock().await;
        state.session.as_ref().map(|session| FeedSession {
            category: session.category.clone(),
            exhausted: session.exhausted,
            fetch_in_flight: session.fetch_in_flight,
            delivered: session.delivered,
        })
    }

    /// Switch to a category and fetch its first batch.
    ///
    /// An unknown key fails before any state mutation, leaving whatever
    /// session was active untouched. Activation replaces the session
    /// wholesale: every previous cursor is dropped, position counting
    /// restarts at zero, and exhaustion is cleared.
    pub async fn activate_category(&self, key: &str) -> Result<()> {
        let spec = self.registry.resolve(key)?;
        let adapter = sources::adapter_for(&spec.source, Arc::clone(&self.transport));

        {
            let mut state = self.state.lock().await;
            state.generation = state.generation.wrapping_add(1);
            state.session = Some(ActiveSession {
                category: key.to_string(),
                adapter: Some(adapter),
                exhausted: false,
                fetch_in_flight: false,
                delivered: 0,
            });
        }

        info!(category = %key, "activated category");
        self.request_more().await.map(|_| ())
    }

    /// Fetch and deliver one more batch for the active category.
    ///
    /// Returns `Ok(true)` when a non-empty batch was delivered and
    /// `Ok(false)` for every no-op: no active session, a fetch already in
    /// flight, an exhausted session, an empty batch, or a stale result
    /// from a superseded category. Safe to call repeatedly from a
    /// proximity trigger. A fetch error clears the in-flight flag, leaves
    /// the cursor and exhaustion untouched, and surfaces through both
    /// `Sink::on_error` and the returned error, so a later call retries.
    pub async fn request_more(&self) -> Result<bool> {
        let (generation, category, mut adapter) = {
            let mut state = self.state.lock().await;
            let generation = state.generation;
            let Some(session) = state.session.as_mut() else {
                return Ok(false);
            };
            if session.fetch_in_flight || session.exhausted {
                debug!(
                    category = %session.category,
                    in_flight = session.fetch_in_flight,
                    exhausted = session.exhausted,
                    "dropping request_more"
                );
                return Ok(false);
            }
            let Some(adapter) = session.adapter.take() else {
                return Ok(false);
            };
            session.fetch_in_flight = true;
            (generation, session.category.clone(), adapter)
        };

        // No lock held while the fetch is outstanding.
        let outcome = adapter.fetch_next_batch().await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!(category = %category, "discarding batch from superseded category");
            return Ok(false);
        }
        let Some(session) = state.session.as_mut() else {
            return Ok(false);
        };
        session.fetch_in_flight = false;
        session.adapter = Some(adapter);

        let batch = match outcome {
            Ok(batch) => batch,
            Err(err) => {
                self.sink.on_error(&err);
                return Err(err);
            }
        };

        if batch.stories.is_empty() {
            if !session.exhausted {
                session.exhausted = true;
                self.sink.on_exhausted();
            }
            debug!(category = %category, "source exhausted");
            return Ok(false);
        }

        for (offset, story) in batch.stories.iter().enumerate() {
            self.sink.render(story, session.delivered + offset);
        }
        session.delivered += batch.stories.len();

        if batch.exhausted {
            session.exhausted = true;
            self.sink.on_exhausted();
        }

        info!(
            category = %category,
            count = batch.stories.len(),
            delivered = session.delivered,
            exhausted = session.exhausted,
            "delivered batch"
        );
        Ok(true)
    }
}
