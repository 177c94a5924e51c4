//! Cross-cutting, shared constants.
//!
//! The wire layout constants define the cache value format. Changing any of them invalidates
//! every value already stored under the current key prefix.

/// Size of the fixed header region at the start of every full-form cache value.
pub const HEADER_REGION_SIZE: usize = 1024;

/// Byte used to pad the header JSON up to [`HEADER_REGION_SIZE`].
pub const HEADER_PADDING: u8 = b' ';

/// Sentinel value stored for a cacheable "not found" outcome.
pub const NOT_FOUND_SENTINEL: &[u8; 3] = b"404";

/// Sentinel value stored for a cacheable "forbidden" outcome.
pub const FORBIDDEN_SENTINEL: &[u8; 3] = b"403";

pub const SENTINEL_LEN: usize = 3;

/// Header added to every decoded cache hit.
pub const CACHE_HIT_HEADER: &str = "x-memcached";
pub const CACHE_HIT_VALUE: &str = "hit";

/// Reserved header-region flag marking a structured (JSON) payload.
pub const JSON_PAYLOAD_FLAG: &str = "x-memcached-json";

pub const CONTENT_TYPE: &str = "content-type";
pub const CONTENT_LENGTH: &str = "content-length";
pub const LAST_MODIFIED: &str = "last-modified";
pub const EXPIRES: &str = "expires";

/// Fallback TTL when no expiry (or no `default` partition) is configured.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Default namespace for cache keys.
pub const DEFAULT_KEY_PREFIX: &str = "TL";

pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_FORBIDDEN: u16 = 403;

/// Legacy backend messages that mean "not found".
pub const TILE_NOT_FOUND_MESSAGE: &str = "Tile does not exist";
pub const GRID_NOT_FOUND_MESSAGE: &str = "Grid does not exist";
pub const LEGACY_NOT_FOUND_MESSAGES: [&str; 2] = [TILE_NOT_FOUND_MESSAGE, GRID_NOT_FOUND_MESSAGE];
