use super::*;
use crate::resource::{Headers, Resource};

fn ok() -> FetchResult {
    Ok(Resource::new("tile", Headers::new()))
}

#[test]
fn test_success_is_found() {
    assert_eq!(Classifier::new().classify(&ok()), CacheClass::Found);
}

#[test]
fn test_status_codes() {
    let classifier = Classifier::new();

    assert_eq!(
        classifier.classify(&Err(FetchError::with_status(404, "missing"))),
        CacheClass::NotFound
    );
    assert_eq!(
        classifier.classify(&Err(FetchError::with_status(403, "nope"))),
        CacheClass::Forbidden
    );
    assert_eq!(
        classifier.classify(&Err(FetchError::with_status(500, "boom"))),
        CacheClass::Uncacheable
    );
    assert_eq!(
        classifier.classify(&Err(FetchError::new("socket hang up"))),
        CacheClass::Uncacheable
    );
}

#[test]
fn test_legacy_messages_are_not_found() {
    let classifier = Classifier::new();

    assert_eq!(
        classifier.classify(&Err(FetchError::new("Tile does not exist"))),
        CacheClass::NotFound
    );
    assert_eq!(
        classifier.classify(&Err(FetchError::new("Grid does not exist"))),
        CacheClass::NotFound
    );
    assert_eq!(
        classifier.classify(&Err(FetchError::new("tile does not exist"))),
        CacheClass::Uncacheable
    );
}

#[test]
fn test_reported_status_wins_over_message() {
    let err = FetchError::with_status(503, "Tile does not exist");
    assert_eq!(
        Classifier::new().classify(&Err(err)),
        CacheClass::Uncacheable
    );
}

#[test]
fn test_custom_extractor() {
    let classifier = Classifier::with_status_extractor(|err| match err.message.as_str() {
        "gone" => Some(404),
        "private" => Some(403),
        _ => None,
    });

    assert_eq!(
        classifier.classify(&Err(FetchError::new("gone"))),
        CacheClass::NotFound
    );
    assert_eq!(
        classifier.classify(&Err(FetchError::new("private"))),
        CacheClass::Forbidden
    );
    // Custom extractor replaces the default entirely.
    assert_eq!(
        classifier.classify(&Err(FetchError::with_status(404, "missing"))),
        CacheClass::Uncacheable
    );
    assert_eq!(classifier.classify(&ok()), CacheClass::Found);
}

#[test]
fn test_is_cacheable() {
    assert!(CacheClass::Found.is_cacheable());
    assert!(CacheClass::NotFound.is_cacheable());
    assert!(CacheClass::Forbidden.is_cacheable());
    assert!(!CacheClass::Uncacheable.is_cacheable());
}
