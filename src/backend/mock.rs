use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use super::Backend;
use crate::resource::{FetchError, FetchResult};

/// Fixture-driven backend that counts fetches. Unknown identifiers answer 404.
#[derive(Debug)]
pub struct MockBackend {
    descriptor: Value,
    fixtures: Mutex<HashMap<String, FetchResult>>,
    fetches: AtomicUsize,
    delay: Duration,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            descriptor: json!({ "type": "mock" }),
            fixtures: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Every fetch sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_descriptor(mut self, descriptor: Value) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn with_fixture(self, identifier: &str, result: FetchResult) -> Self {
        self.set(identifier, result);
        self
    }

    /// Replaces the answer for `identifier`.
    pub fn set(&self, identifier: &str, result: FetchResult) {
        self.fixtures.lock().insert(identifier.to_string(), result);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn fetch(&self, identifier: &str) -> FetchResult {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.fixtures
            .lock()
            .get(identifier)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::not_found()))
    }

    fn descriptor(&self) -> Value {
        self.descriptor.clone()
    }
}
