use super::*;

fn partitioned(entries: &[(&str, u64)]) -> Expiry {
    Expiry::Partitioned(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
    )
}

#[test]
fn test_default_is_300_seconds() {
    assert_eq!(Expiry::default().resolve(None), Duration::from_secs(300));
    assert_eq!(
        ExpiryResolver::default().resolve("anything").ttl,
        Duration::from_secs(300)
    );
}

#[test]
fn test_uniform_ignores_partition() {
    let expiry = Expiry::from(5);
    assert_eq!(expiry.seconds_for(None), 5);
    assert_eq!(expiry.seconds_for(Some("example.com")), 5);
}

#[test]
fn test_partitioned_lookup_and_fallbacks() {
    let expiry = partitioned(&[("test", 10), ("default", 60)]);
    assert_eq!(expiry.seconds_for(Some("test")), 10);
    assert_eq!(expiry.seconds_for(Some("long")), 60);
    assert_eq!(expiry.seconds_for(None), 60);

    let no_default = partitioned(&[("test", 10)]);
    assert_eq!(no_default.seconds_for(Some("long")), DEFAULT_TTL_SECS);
}

#[test]
fn test_host_partition() {
    assert_eq!(
        host_partition("http://test/0/0/0.png").as_deref(),
        Some("test")
    );
    assert_eq!(
        host_partition("https://tiles.example.com:8443/a.json").as_deref(),
        Some("tiles.example.com")
    );
    assert_eq!(host_partition("tile/0/0/0"), None);
}

#[test]
fn test_resolver_resolves_both_ttls_per_host() {
    let resolver = ExpiryResolver::new(
        partitioned(&[("test", 30), ("default", 120)]),
        partitioned(&[("test", 1)]),
    );

    let test = resolver.resolve("http://test/0/0/0.png");
    assert_eq!(test.ttl, Duration::from_secs(30));
    assert_eq!(test.fresh, Duration::from_secs(1));

    let long = resolver.resolve("http://long/0/0/0.png");
    assert_eq!(long.ttl, Duration::from_secs(120));
    assert_eq!(long.fresh, Duration::from_secs(DEFAULT_TTL_SECS));
}

#[test]
fn test_custom_partitioner() {
    let resolver = ExpiryResolver::new(partitioned(&[("grid", 7)]), Expiry::default())
        .with_partitioner(|id| id.split('/').next().map(str::to_string));

    assert_eq!(resolver.resolve("grid/0/0/0").ttl, Duration::from_secs(7));
    assert_eq!(resolver.resolve("tile/0/0/0").ttl, Duration::from_secs(300));
}

#[test]
fn test_parse_from_str() {
    assert_eq!("42".parse::<Expiry>().unwrap(), Expiry::Uniform(42));
    assert_eq!(
        r#"{"test": 1, "default": 2}"#.parse::<Expiry>().unwrap(),
        partitioned(&[("test", 1), ("default", 2)])
    );
    assert!("soon".parse::<Expiry>().is_err());
    assert!("-1".parse::<Expiry>().is_err());
}
