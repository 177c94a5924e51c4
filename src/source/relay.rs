use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use super::{Lookup, Memsource};
use crate::clock::{http_date, parse_http_date};
use crate::codec::CacheEntry;
use crate::constants::EXPIRES;
use crate::expiry::ResolvedExpiry;
use crate::resource::FetchResult;

/// Absolute freshness deadline `fresh` from `now`, saturating at the far future.
fn expires_at(now: DateTime<Utc>, fresh: std::time::Duration) -> DateTime<Utc> {
    TimeDelta::from_std(fresh)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Sentinel entries carry no headers and therefore always count as stale.
fn is_fresh(entry: &CacheEntry, now: DateTime<Utc>) -> bool {
    match entry {
        CacheEntry::Found(resource) => resource
            .headers
            .get(EXPIRES)
            .and_then(parse_http_date)
            .is_some_and(|expires| expires > now),
        CacheEntry::NotFound | CacheEntry::Forbidden => false,
    }
}

impl Memsource {
    /// Stale-while-revalidate: cached entries are served immediately and refreshed in the
    /// background once their `expires` header has passed.
    pub(super) async fn relay(
        &self,
        identifier: &str,
        key: String,
        expiry: ResolvedExpiry,
    ) -> FetchResult {
        match self.lookup(&key).await {
            Lookup::Hit(entry, _) => {
                if is_fresh(&entry, Utc::now()) {
                    debug!(key = %key, "Relay hit (fresh)");
                } else {
                    debug!(key = %key, "Relay hit (stale), refreshing");
                    self.spawn_refresh(identifier.to_string(), key, expiry);
                }
                entry.into_result()
            }
            Lookup::Miss | Lookup::Corrupt(_) | Lookup::Unavailable => {
                debug!(key = %key, "Relay miss");
                let result = self.stamp(self.fetch(identifier).await, expiry);
                if let Some(entry) = CacheEntry::capture(&result, &self.inner.classifier) {
                    self.spawn_persist(key, expiry.ttl, entry);
                }
                result
            }
        }
    }

    /// Adds an `expires` header to successful results.
    fn stamp(&self, result: FetchResult, expiry: ResolvedExpiry) -> FetchResult {
        result.map(|resource| {
            let expires = expires_at(Utc::now(), expiry.fresh);
            resource.with_header(EXPIRES, http_date(expires))
        })
    }

    fn spawn_refresh(&self, identifier: String, key: String, expiry: ResolvedExpiry) {
        let source = self.clone();
        self.inner.tasks.spawn(async move {
            let result = source.stamp(source.fetch(&identifier).await, expiry);
            match CacheEntry::capture(&result, &source.inner.classifier) {
                Some(entry) => source.persist(&key, expiry.ttl, entry).await,
                None => debug!(key = %key, "Refresh produced an uncacheable result"),
            }
        });
    }
}
