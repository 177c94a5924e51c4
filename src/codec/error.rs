use thiserror::Error;

/// Errors produced while encoding or decoding a cache value.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The header JSON does not fit in the fixed header region.
    #[error("header region overflow: {size} bytes exceeds the {limit}-byte region")]
    HeaderTooLarge { size: usize, limit: usize },

    /// Headers or a JSON payload could not be serialized.
    #[error("failed to serialize cache entry: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Value is neither a sentinel nor long enough to hold the header region.
    #[error("invalid cache value: {len} bytes is shorter than the header region")]
    Truncated { len: usize },

    /// Header region is not a JSON object.
    #[error("invalid cache value: {0}")]
    InvalidHeader(#[source] serde_json::Error),

    #[error("invalid cache value: content-length '{value}' is not a number")]
    InvalidContentLength { value: String },

    #[error("invalid cache value: content-length {declared} does not match payload length {actual}")]
    ContentLengthMismatch { declared: usize, actual: usize },

    /// Payload flagged as JSON failed to parse.
    #[error("invalid cache value: JSON payload failed to parse: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

pub type CodecResult<T> = Result<T, CodecError>;
