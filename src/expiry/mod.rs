//! TTL resolution, optionally partitioned by the identifier's host.
//!
//! ```
//! use memsource::expiry::{Expiry, ExpiryResolver};
//! use std::time::Duration;
//!
//! let expires: Expiry = r#"{"tiles.example.com": 60, "default": 600}"#.parse().unwrap();
//! let resolver = ExpiryResolver::new(expires, Expiry::default());
//!
//! let ttl = resolver.resolve("http://tiles.example.com/0/0/0.png").ttl;
//! assert_eq!(ttl, Duration::from_secs(60));
//! ```

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::constants::DEFAULT_TTL_SECS;

/// Name of the fallback partition in [`Expiry::Partitioned`].
pub const DEFAULT_PARTITION: &str = "default";

/// TTL configuration: one value for everything, or seconds per partition key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Expiry {
    Uniform(u64),
    /// Partition key -> seconds. The `default` entry covers unknown partitions.
    Partitioned(HashMap<String, u64>),
}

impl Default for Expiry {
    fn default() -> Self {
        Expiry::Uniform(DEFAULT_TTL_SECS)
    }
}

impl From<u64> for Expiry {
    fn from(secs: u64) -> Self {
        Expiry::Uniform(secs)
    }
}

impl Expiry {
    /// Seconds for a partition key, falling back to `default`, then to 300.
    pub fn seconds_for(&self, partition: Option<&str>) -> u64 {
        match self {
            Expiry::Uniform(secs) => *secs,
            Expiry::Partitioned(partitions) => partition
                .and_then(|key| partitions.get(key))
                .or_else(|| partitions.get(DEFAULT_PARTITION))
                .copied()
                .unwrap_or(DEFAULT_TTL_SECS),
        }
    }

    pub fn resolve(&self, partition: Option<&str>) -> Duration {
        Duration::from_secs(self.seconds_for(partition))
    }
}

/// Error parsing an [`Expiry`] from text.
#[derive(Debug, thiserror::Error)]
#[error("expected seconds or a JSON object of partition -> seconds: {0}")]
pub struct ExpiryParseError(#[from] serde_json::Error);

impl FromStr for Expiry {
    type Err = ExpiryParseError;

    /// Accepts `300` or `{"example.com": 60, "default": 300}`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s.trim())?)
    }
}

/// Derives a partition key from a request identifier.
pub type Partitioner = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Host of the identifier when it parses as a URL.
pub fn host_partition(identifier: &str) -> Option<String> {
    Url::parse(identifier)
        .ok()?
        .host_str()
        .map(str::to_string)
}

/// TTLs resolved for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedExpiry {
    /// How long the store keeps the entry.
    pub ttl: Duration,
    /// How long a relay entry counts as fresh.
    pub fresh: Duration,
}

/// Resolves the cache TTL and the relay freshness TTL for identifiers.
#[derive(Clone)]
pub struct ExpiryResolver {
    expires: Expiry,
    fresh: Expiry,
    partitioner: Partitioner,
}

impl ExpiryResolver {
    pub fn new(expires: Expiry, fresh: Expiry) -> Self {
        Self {
            expires,
            fresh,
            partitioner: Arc::new(host_partition),
        }
    }

    pub fn with_partitioner<F>(self, partitioner: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.with_shared_partitioner(Arc::new(partitioner))
    }

    pub fn with_shared_partitioner(mut self, partitioner: Partitioner) -> Self {
        self.partitioner = partitioner;
        self
    }

    pub fn expires(&self) -> &Expiry {
        &self.expires
    }

    pub fn fresh(&self) -> &Expiry {
        &self.fresh
    }

    pub fn resolve(&self, identifier: &str) -> ResolvedExpiry {
        let partition = (self.partitioner)(identifier);
        ResolvedExpiry {
            ttl: self.expires.resolve(partition.as_deref()),
            fresh: self.fresh.resolve(partition.as_deref()),
        }
    }
}

impl Default for ExpiryResolver {
    fn default() -> Self {
        Self::new(Expiry::default(), Expiry::default())
    }
}

impl fmt::Debug for ExpiryResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiryResolver")
            .field("expires", &self.expires)
            .field("fresh", &self.fresh)
            .finish_non_exhaustive()
    }
}
