use super::*;
use serde_json::json;

#[test]
fn test_headers_lowercase_names() {
    let mut headers = Headers::new();
    headers.insert("Content-Type", "image/png");

    assert_eq!(headers.get("content-type"), Some("image/png"));
    assert_eq!(headers.get("CONTENT-TYPE"), Some("image/png"));
    assert_eq!(headers.content_type(), Some("image/png"));
}

#[test]
fn test_headers_from_json_object_stringifies_numbers() {
    let object = json!({
        "content-type": "image/png",
        "content-length": 11541,
        "x-ignored": null,
    });
    let headers = Headers::from_json_object(object.as_object().cloned().unwrap());

    assert_eq!(headers.content_length(), Some("11541"));
    assert!(!headers.contains("x-ignored"));
    assert_eq!(headers.len(), 2);
}

#[test]
fn test_headers_declares_json() {
    let json_headers: Headers = [("content-type", "application/json; charset=utf-8")]
        .into_iter()
        .collect();
    let png_headers: Headers = [("content-type", "image/png")].into_iter().collect();

    assert!(json_headers.declares_json());
    assert!(!png_headers.declares_json());
    assert!(!Headers::new().declares_json());
}

#[test]
fn test_payload_conversions() {
    assert_eq!(Payload::from("abc").as_bytes(), Some(&b"abc"[..]));
    assert_eq!(
        Payload::from(String::from("abc")),
        Payload::Bytes(Bytes::from_static(b"abc"))
    );
    assert!(Payload::from(json!({"a": 1})).is_json());
}

#[test]
fn test_payload_to_bytes_serializes_json() {
    let payload = Payload::from(json!({"keys": ["", "1"]}));
    let bytes = payload.to_bytes().expect("serialize");

    assert_eq!(&bytes[..], br#"{"keys":["","1"]}"#);
}

#[test]
fn test_resource_is_cached() {
    let resource = Resource::new("data", Headers::new());
    assert!(!resource.is_cached());

    let resource = resource.with_header("x-memcached", "hit");
    assert!(resource.is_cached());
}

#[test]
fn test_fetch_error_constructors() {
    let err = FetchError::not_found();
    assert_eq!(err.status, Some(404));
    assert!(!err.is_cached());
    assert!(err.clone().into_cached().is_cached());

    assert_eq!(FetchError::forbidden().status, Some(403));
    assert_eq!(FetchError::new("boom").to_string(), "boom");
}
