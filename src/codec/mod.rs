//! Cache value codec.
//!
//! Two layouts share one key space:
//!
//! - **Sentinel**: the 3-byte literals `404` / `403` for cacheable errors.
//! - **Full**: a [`HEADER_REGION_SIZE`]-byte region holding the header JSON padded with spaces,
//!   followed by the raw payload bytes.
//!
//! Uncacheable failures have no representation; [`CacheEntry::capture`] returns `None` for them.

pub mod error;


pub use error::{CodecError, CodecResult};

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::classify::{CacheClass, Classifier};
use crate::constants::{
    CACHE_HIT_HEADER, CACHE_HIT_VALUE, FORBIDDEN_SENTINEL, HEADER_PADDING, HEADER_REGION_SIZE,
    JSON_PAYLOAD_FLAG, NOT_FOUND_SENTINEL, SENTINEL_LEN,
};
use crate::resource::{FetchError, FetchResult, Headers, Payload, Resource};

/// A backend outcome in cacheable form.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    NotFound,
    Forbidden,
    Found(Resource),
}

impl CacheEntry {
    /// Converts a fetch result into an entry, or `None` if it must not be cached.
    pub fn capture(result: &FetchResult, classifier: &Classifier) -> Option<Self> {
        match (classifier.classify(result), result) {
            (CacheClass::Found, Ok(resource)) => Some(CacheEntry::Found(resource.clone())),
            (CacheClass::NotFound, _) => Some(CacheEntry::NotFound),
            (CacheClass::Forbidden, _) => Some(CacheEntry::Forbidden),
            _ => None,
        }
    }

    pub fn class(&self) -> CacheClass {
        match self {
            CacheEntry::NotFound => CacheClass::NotFound,
            CacheEntry::Forbidden => CacheClass::Forbidden,
            CacheEntry::Found(_) => CacheClass::Found,
        }
    }

    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let resource = match self {
            CacheEntry::NotFound => return Ok(NOT_FOUND_SENTINEL.to_vec()),
            CacheEntry::Forbidden => return Ok(FORBIDDEN_SENTINEL.to_vec()),
            CacheEntry::Found(resource) => resource,
        };

        let mut object = Map::new();
        for (name, value) in resource.headers.iter() {
            if name == CACHE_HIT_HEADER || name == JSON_PAYLOAD_FLAG {
                continue;
            }
            object.insert(name.to_string(), Value::String(value.to_string()));
        }
        if resource.payload.is_json() {
            object.insert(JSON_PAYLOAD_FLAG.to_string(), Value::Bool(true));
        }

        let header = serde_json::to_vec(&object).map_err(CodecError::Serialize)?;
        if header.len() > HEADER_REGION_SIZE {
            return Err(CodecError::HeaderTooLarge {
                size: header.len(),
                limit: HEADER_REGION_SIZE,
            });
        }

        let body = resource.payload.to_bytes().map_err(CodecError::Serialize)?;

        let mut value = Vec::with_capacity(HEADER_REGION_SIZE + body.len());
        value.extend_from_slice(&header);
        value.resize(HEADER_REGION_SIZE, HEADER_PADDING);
        value.extend_from_slice(&body);
        Ok(value)
    }

    /// Decodes a stored value. Successful entries gain the `x-memcached: hit` header.
    pub fn decode(value: &[u8]) -> CodecResult<Self> {
        if value.len() == SENTINEL_LEN {
            if value == NOT_FOUND_SENTINEL {
                return Ok(CacheEntry::NotFound);
            }
            if value == FORBIDDEN_SENTINEL {
                return Ok(CacheEntry::Forbidden);
            }
        }

        if value.len() < HEADER_REGION_SIZE {
            return Err(CodecError::Truncated { len: value.len() });
        }

        let (region, body) = value.split_at(HEADER_REGION_SIZE);
        let mut object: Map<String, Value> =
            serde_json::from_slice(region.trim_ascii()).map_err(CodecError::InvalidHeader)?;

        let json_flagged = match object.remove(JSON_PAYLOAD_FLAG) {
            Some(Value::Bool(flag)) => flag,
            Some(Value::String(flag)) => flag == "true",
            _ => false,
        };
        let mut headers = Headers::from_json_object(object);

        if let Some(declared) = headers.content_length() {
            let declared: usize =
                declared
                    .trim()
                    .parse()
                    .map_err(|_| CodecError::InvalidContentLength {
                        value: declared.to_string(),
                    })?;
            if declared != body.len() {
                return Err(CodecError::ContentLengthMismatch {
                    declared,
                    actual: body.len(),
                });
            }
        }

        let payload = if json_flagged {
            Payload::Json(serde_json::from_slice(body).map_err(CodecError::InvalidPayload)?)
        } else if headers.declares_json() {
            // Mislabeled bodies stay raw instead of failing the whole entry.
            match serde_json::from_slice(body) {
                Ok(value) => Payload::Json(value),
                Err(_) => Payload::Bytes(Bytes::copy_from_slice(body)),
            }
        } else {
            Payload::Bytes(Bytes::copy_from_slice(body))
        };

        headers.insert(CACHE_HIT_HEADER, CACHE_HIT_VALUE);
        Ok(CacheEntry::Found(Resource { payload, headers }))
    }

    /// Converts the entry back into the result a caller sees, tagged as cache-sourced.
    pub fn into_result(self) -> FetchResult {
        match self {
            CacheEntry::NotFound => Err(FetchError::not_found().into_cached()),
            CacheEntry::Forbidden => Err(FetchError::forbidden().into_cached()),
            CacheEntry::Found(resource) => Ok(resource),
        }
    }
}
