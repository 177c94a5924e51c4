//! Shared fixtures for integration tests.

use std::sync::Arc;
use std::time::Duration;

use memsource::{
    CacheStore, CollectingReporter, Expiry, FetchResult, Headers, Memsource, MockBackend, Mode,
    Resource,
};

pub const TILE_URL: &str = "http://tiles.example.com/3/4/2.png";

pub fn png(body: &'static str) -> FetchResult {
    let mut headers = Headers::new();
    headers.insert("content-type", "image/png");
    Ok(Resource::new(body, headers))
}

pub struct Engine {
    pub backend: Arc<MockBackend>,
    pub reporter: Arc<CollectingReporter>,
    pub source: Memsource,
}

/// Builder with the knobs integration tests vary.
pub struct EngineBuilder {
    mode: Mode,
    expires: Expiry,
    fresh_ttl: Expiry,
    backend: MockBackend,
}

impl EngineBuilder {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            expires: Expiry::default(),
            fresh_ttl: Expiry::default(),
            backend: MockBackend::new(),
        }
    }

    pub fn expires(mut self, secs: u64) -> Self {
        self.expires = Expiry::Uniform(secs);
        self
    }

    pub fn fresh_ttl(mut self, secs: u64) -> Self {
        self.fresh_ttl = Expiry::Uniform(secs);
        self
    }

    pub fn fixture(mut self, identifier: &str, result: FetchResult) -> Self {
        self.backend = self.backend.with_fixture(identifier, result);
        self
    }

    pub fn backend_delay(mut self, delay: Duration) -> Self {
        self.backend = self.backend.with_delay(delay);
        self
    }

    pub fn build(self, store: Arc<dyn CacheStore>) -> Engine {
        let backend = Arc::new(self.backend);
        let reporter = Arc::new(CollectingReporter::new());
        let source = Memsource::builder(store, backend.clone())
            .mode(self.mode)
            .expires(self.expires)
            .fresh_ttl(self.fresh_ttl)
            .reporter(reporter.clone())
            .build();
        Engine {
            backend,
            reporter,
            source,
        }
    }
}
