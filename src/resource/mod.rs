//! Backend outcome model: payloads, headers and fetch errors.
//!
//! A backend answers every request with a [`FetchResult`]. The same shape is returned to callers
//! whether the answer came from the cache or from a live fetch; cache-sourced answers are marked
//! with [`CACHE_HIT_HEADER`] (successes) or [`FetchError::cached`] (errors).

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::constants::{
    CACHE_HIT_HEADER, CACHE_HIT_VALUE, CONTENT_LENGTH, CONTENT_TYPE, STATUS_FORBIDDEN,
    STATUS_NOT_FOUND,
};

/// Result of asking a backend (or the cache) for a resource.
pub type FetchResult = Result<Resource, FetchError>;

/// Body of a resource: raw bytes or a structured JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Bytes(Bytes),
    Json(Value),
}

impl Payload {
    #[inline]
    pub fn is_json(&self) -> bool {
        matches!(self, Payload::Json(_))
    }

    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Payload::Bytes(bytes) => Some(bytes),
            Payload::Json(_) => None,
        }
    }

    #[inline]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Bytes(_) => None,
        }
    }

    /// Serializes the payload to the bytes stored after the header region.
    pub fn to_bytes(&self) -> Result<Bytes, serde_json::Error> {
        match self {
            Payload::Bytes(bytes) => Ok(bytes.clone()),
            Payload::Json(value) => serde_json::to_vec(value).map(Bytes::from),
        }
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for Payload {
    fn from(bytes: &'static [u8]) -> Self {
        Payload::Bytes(Bytes::from_static(bytes))
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Bytes(Bytes::from(text))
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Bytes(Bytes::copy_from_slice(text.as_bytes()))
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

/// Response headers with lower-cased names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, lower-casing its name. Returns the previous value.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.as_ref().to_ascii_lowercase(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get(CONTENT_TYPE)
    }

    pub fn content_length(&self) -> Option<&str> {
        self.get(CONTENT_LENGTH)
    }

    /// Returns `true` if the declared content type is a JSON media type.
    pub fn declares_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ctype| ctype.to_ascii_lowercase().contains("json"))
    }

    /// Builds headers from a decoded JSON object. Numbers and booleans are kept in their JSON
    /// text form (backends commonly report `content-length` as a number); `null` is dropped.
    pub fn from_json_object(object: serde_json::Map<String, Value>) -> Self {
        let mut headers = Self::new();
        for (name, value) in object {
            let value = match value {
                Value::String(s) => s,
                Value::Null => continue,
                other => other.to_string(),
            };
            headers.insert(name, value);
        }
        headers
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// A successfully produced resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub payload: Payload,
    pub headers: Headers,
}

impl Resource {
    pub fn new(payload: impl Into<Payload>, headers: Headers) -> Self {
        Self {
            payload: payload.into(),
            headers,
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns `true` if this resource was served from the cache.
    #[inline]
    pub fn is_cached(&self) -> bool {
        self.headers.get(CACHE_HIT_HEADER) == Some(CACHE_HIT_VALUE)
    }
}

/// Error produced by a backend, or restored from a cached sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    /// HTTP-style status, when the backend reports one.
    pub status: Option<u16>,
    pub message: String,
    /// `true` when this error was restored from the cache.
    pub cached: bool,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            cached: false,
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            cached: false,
        }
    }

    pub fn not_found() -> Self {
        Self::with_status(STATUS_NOT_FOUND, "Not found")
    }

    pub fn forbidden() -> Self {
        Self::with_status(STATUS_FORBIDDEN, "Forbidden")
    }

    /// Marks the error as restored from the cache.
    pub fn into_cached(mut self) -> Self {
        self.cached = true;
        self
    }

    pub fn is_cached(&self) -> bool {
        self.cached
    }
}
