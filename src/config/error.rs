//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::expiry::ExpiryParseError;
use crate::source::ModeParseError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `MEMSOURCE_MODE` is not one of the known strategies.
    #[error("failed to parse mode '{value}': {source}")]
    InvalidMode {
        value: String,
        #[source]
        source: ModeParseError,
    },

    /// An expiry variable is neither seconds nor a JSON object of seconds.
    #[error("failed to parse {name}='{value}': {source}")]
    InvalidExpiry {
        name: &'static str,
        value: String,
        #[source]
        source: ExpiryParseError,
    },

    #[error("failed to parse {name}='{value}': {source}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("{name} must be greater than zero")]
    ZeroValue { name: &'static str },

    #[error("key prefix must not be empty")]
    EmptyKeyPrefix,

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
