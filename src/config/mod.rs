//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `MEMSOURCE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::DEFAULT_KEY_PREFIX;
use crate::expiry::Expiry;
use crate::source::Mode;
use crate::store::timeout::DEFAULT_STORE_TIMEOUT;

/// Engine configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `MEMSOURCE_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Retrieval strategy. Default: `readthrough`.
    pub mode: Mode,

    /// Store TTL, uniform or per host. Default: `300`.
    pub expires: Expiry,

    /// Relay freshness TTL, same syntax as `expires`. Default: `300`.
    pub fresh_ttl: Expiry,

    /// First segment of every cache key. Default: `TL`.
    pub key_prefix: String,

    /// Upper bound on a single store call. Default: 1000ms.
    pub store_timeout: Duration,

    /// Max entries in the in-memory store. Default: `10_000`.
    pub store_capacity: u64,

    /// Directory served by the demo binary. Default: `.`.
    pub root: PathBuf,
}

/// Default capacity of the in-memory store.
pub const DEFAULT_STORE_CAPACITY: u64 = 10_000;

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            expires: Expiry::default(),
            fresh_ttl: Expiry::default(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
            store_capacity: DEFAULT_STORE_CAPACITY,
            root: PathBuf::from("."),
        }
    }
}

impl Config {
    const ENV_MODE: &'static str = "MEMSOURCE_MODE";
    const ENV_EXPIRES: &'static str = "MEMSOURCE_EXPIRES";
    const ENV_TTL: &'static str = "MEMSOURCE_TTL";
    const ENV_KEY_PREFIX: &'static str = "MEMSOURCE_KEY_PREFIX";
    const ENV_STORE_TIMEOUT_MS: &'static str = "MEMSOURCE_STORE_TIMEOUT_MS";
    const ENV_STORE_CAPACITY: &'static str = "MEMSOURCE_STORE_CAPACITY";
    const ENV_ROOT: &'static str = "MEMSOURCE_ROOT";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mode = Self::parse_mode_from_env(defaults.mode)?;
        let expires = Self::parse_expiry_from_env(Self::ENV_EXPIRES, defaults.expires)?;
        let fresh_ttl = Self::parse_expiry_from_env(Self::ENV_TTL, defaults.fresh_ttl)?;
        let key_prefix = Self::parse_string_from_env(Self::ENV_KEY_PREFIX, defaults.key_prefix);
        let store_timeout = Self::parse_u64_from_env(
            Self::ENV_STORE_TIMEOUT_MS,
            defaults.store_timeout.as_millis() as u64,
        )
        .map(Duration::from_millis)?;
        let store_capacity =
            Self::parse_u64_from_env(Self::ENV_STORE_CAPACITY, defaults.store_capacity)?;
        let root = Self::parse_path_from_env(Self::ENV_ROOT, defaults.root);

        Ok(Self {
            mode,
            expires,
            fresh_ttl,
            key_prefix,
            store_timeout,
            store_capacity,
            root,
        })
    }

    /// Checks basic invariants and that `root` is a directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyKeyPrefix);
        }
        if self.store_timeout.is_zero() {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_STORE_TIMEOUT_MS,
            });
        }
        if self.store_capacity == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_STORE_CAPACITY,
            });
        }
        if !self.root.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.root.clone(),
            });
        }
        if !self.root.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.root.clone(),
            });
        }
        Ok(())
    }

    fn parse_mode_from_env(default: Mode) -> Result<Mode, ConfigError> {
        match env::var(Self::ENV_MODE) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidMode { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_expiry_from_env(
        var_name: &'static str,
        default: Expiry,
    ) -> Result<Expiry, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::InvalidExpiry {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }
}
