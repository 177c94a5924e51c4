use std::time::Duration;

use tracing::debug;

use super::{Lookup, Memsource};
use crate::codec::CacheEntry;
use crate::resource::FetchResult;

impl Memsource {
    /// Cache first. Misses are fetched, returned, then written in the background.
    pub(super) async fn read_through(
        &self,
        identifier: &str,
        key: String,
        ttl: Duration,
    ) -> FetchResult {
        match self.lookup(&key).await {
            Lookup::Hit(entry, _) => {
                debug!(key = %key, class = ?entry.class(), "Cache hit");
                return entry.into_result();
            }
            Lookup::Unavailable => {
                // Store is down: serve from the backend and skip the write.
                return self.fetch(identifier).await;
            }
            Lookup::Miss | Lookup::Corrupt(_) => {
                debug!(key = %key, "Cache miss");
            }
        }

        let result = self.fetch(identifier).await;
        if let Some(entry) = CacheEntry::capture(&result, &self.inner.classifier) {
            self.spawn_persist(key, ttl, entry);
        }
        result
    }
}
