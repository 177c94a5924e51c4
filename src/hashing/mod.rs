//! Cache key derivation.
//!
//! Keys have the form `{prefix}-{fingerprint}-{identifier}`. The fingerprint is a BLAKE3 digest
//! of the backend descriptor, so two backends with different configuration never read each
//! other's entries even when they share a store and a prefix.

use serde_json::Value;

/// Hex characters kept from the BLAKE3 digest (128 bits).
pub const FINGERPRINT_HEX_LEN: usize = 32;

/// Stable fingerprint of a backend descriptor.
///
/// `serde_json` serializes object keys in sorted order (no `preserve_order` feature), so two
/// descriptors with the same content always hash the same.
pub fn fingerprint(descriptor: &Value) -> String {
    let canonical = descriptor.to_string();
    let hash = blake3::hash(canonical.as_bytes());
    let mut hex = hash.to_hex().to_string();
    hex.truncate(FINGERPRINT_HEX_LEN);
    hex
}

/// Builds cache keys for one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBuilder {
    prefix: String,
    fingerprint: String,
}

impl KeyBuilder {
    pub fn new(prefix: impl Into<String>, descriptor: &Value) -> Self {
        Self {
            prefix: prefix.into(),
            fingerprint: fingerprint(descriptor),
        }
    }

    #[inline]
    pub fn key(&self, identifier: &str) -> String {
        format!("{}-{}-{}", self.prefix, self.fingerprint, identifier)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fingerprint_determinism() {
        let descriptor = json!({ "type": "directory", "root": "/srv/tiles" });

        let a = fingerprint(&descriptor);
        let b = fingerprint(&descriptor.clone());

        assert_eq!(a, b);
        assert_eq!(a.len(), FINGERPRINT_HEX_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_ignores_key_order() {
        let a = json!({ "a": 1, "b": 2 });
        let b: Value = serde_json::from_str(r#"{"b": 2, "a": 1}"#).unwrap();

        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_uniqueness() {
        let descriptors = [
            json!({ "root": "/srv/a" }),
            json!({ "root": "/srv/b" }),
            json!({ "root": "/srv/a", "scale": 2 }),
            Value::Null,
        ];

        let mut fingerprints: Vec<_> = descriptors.iter().map(fingerprint).collect();
        fingerprints.sort();
        fingerprints.dedup();

        assert_eq!(fingerprints.len(), descriptors.len());
    }

    #[test]
    fn test_key_format() {
        let keys = KeyBuilder::new("TL", &json!({ "root": "/srv/a" }));
        let key = keys.key("tile/0/0/0");

        assert!(key.starts_with("TL-"));
        assert!(key.ends_with("-tile/0/0/0"));
        assert_eq!(
            key,
            format!("TL-{}-tile/0/0/0", keys.fingerprint())
        );
    }

    #[test]
    fn test_distinct_backends_distinct_keys() {
        let a = KeyBuilder::new("TL", &json!({ "root": "/srv/a" }));
        let b = KeyBuilder::new("TL", &json!({ "root": "/srv/b" }));

        assert_ne!(a.key("http://test/0/0/0.png"), b.key("http://test/0/0/0.png"));
    }
}
