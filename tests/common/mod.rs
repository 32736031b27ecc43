#![allow(dead_code)]

use async_trait::async_trait;
use prism_feed::sources::hacker_news::HN_API;
use prism_feed::sources::reddit::REDDIT_API;
use prism_feed::{FeedError, Result, Sink, Story, Transport};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

enum MockResponse {
    Json(Value),
    Text(String),
    NetworkError(String),
}

/// Pauses a transport call at a given URL until the test releases it.
#[derive(Clone)]
pub struct Gate {
    /// Receives one permit when the gated call arrives at the transport.
    pub entered: Arc<Semaphore>,
    /// Give it a permit to let the gated call proceed.
    pub release: Arc<Semaphore>,
}

/// In-memory [`Transport`] keyed by exact URL, with a call log and
/// optional per-URL gating for interleaving tests.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, MockResponse>>,
    gates: Mutex<HashMap<String, Gate>>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn put_json(&self, url: &str, value: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), MockResponse::Json(value));
    }

    pub fn put_text(&self, url: &str, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), MockResponse::Text(body.to_string()));
    }

    pub fn put_network_error(&self, url: &str, reason: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), MockResponse::NetworkError(reason.to_string()));
    }

    /// Gate all subsequent calls to `url`.
    pub fn gate(&self, url: &str) -> Gate {
        let gate = Gate {
            entered: Arc::new(Semaphore::new(0)),
            release: Arc::new(Semaphore::new(0)),
        };
        self.gates
            .lock()
            .unwrap()
            .insert(url.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == url)
            .count()
    }

    async fn respond(&self, url: &str) -> Result<MockResponse> {
        self.calls.lock().unwrap().push(url.to_string());

        let gate = self.gates.lock().unwrap().get(url).cloned();
        if let Some(gate) = gate {
            gate.entered.add_permits(1);
            gate.release.acquire().await.unwrap().forget();
        }

        let responses = self.responses.lock().unwrap();
        match responses.get(url) {
            Some(MockResponse::Json(value)) => Ok(MockResponse::Json(value.clone())),
            Some(MockResponse::Text(body)) => Ok(MockResponse::Text(body.clone())),
            Some(MockResponse::NetworkError(reason)) => Err(FeedError::Network {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => Err(FeedError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        match self.respond(url).await? {
            MockResponse::Json(value) => Ok(value),
            _ => Err(FeedError::parse(url, "expected JSON response")),
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        match self.respond(url).await? {
            MockResponse::Text(body) => Ok(body),
            MockResponse::Json(value) => Ok(value.to_string()),
            MockResponse::NetworkError(_) => unreachable!(),
        }
    }
}

/// Records everything the controller delivers.
#[derive(Default)]
pub struct RecordingSink {
    rendered: Mutex<Vec<(usize, Story)>>,
    exhausted: AtomicUsize,
    errors: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn rendered(&self) -> Vec<(usize, Story)> {
        self.rendered.lock().unwrap().clone()
    }

    pub fn positions(&self) -> Vec<usize> {
        self.rendered.lock().unwrap().iter().map(|(p, _)| *p).collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.rendered
            .lock()
            .unwrap()
            .iter()
            .map(|(_, s)| s.id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rendered.lock().unwrap().len()
    }

    pub fn exhausted_count(&self) -> usize {
        self.exhausted.load(Ordering::SeqCst)
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Sink for RecordingSink {
    fn render(&self, story: &Story, position: usize) {
        self.rendered.lock().unwrap().push((position, story.clone()));
    }

    fn on_exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, err: &FeedError) {
        self.errors.lock().unwrap().push(err.to_string());
    }
}

pub fn hn_top_url() -> String {
    format!("{HN_API}/topstories.json")
}

pub fn hn_item_url(id: u64) -> String {
    format!("{HN_API}/item/{id}.json")
}

pub fn subreddit_url(path: &str, after: Option<&str>) -> String {
    let mut url = format!("{REDDIT_API}/{path}/hot.json?limit=15");
    if let Some(after) = after {
        url.push_str("&after=");
        url.push_str(after);
    }
    url
}

pub fn hn_item(id: u64, title: &str, url: Option<&str>) -> Value {
    let mut item = json!({
        "id": id,
        "title": title,
        "score": 100,
        "by": "alice",
        "time": 1_700_000_000,
        "type": "story",
    });
    if let Some(url) = url {
        item["url"] = json!(url);
    }
    item
}

/// Seed a ranked id list plus a detail payload for every id.
pub fn seed_hn(transport: &MockTransport, ids: &[u64]) {
    transport.put_json(&hn_top_url(), json!(ids));
    for &id in ids {
        transport.put_json(
            &hn_item_url(id),
            hn_item(id, &format!("Story {id}"), Some(&format!("https://example.com/{id}"))),
        );
    }
}

pub fn reddit_post(id: &str, title: &str, stickied: bool) -> Value {
    json!({
        "data": {
            "id": id,
            "title": title,
            "stickied": stickied,
            "url": format!("https://example.com/{id}"),
            "score": 42,
            "author": "bob",
            "created_utc": 1_700_000_000.0,
            "domain": "example.com",
            "permalink": format!("/r/test/comments/{id}/"),
        }
    })
}

pub fn reddit_page(after: Option<&str>, children: Vec<Value>) -> Value {
    json!({ "data": { "after": after, "children": children } })
}
