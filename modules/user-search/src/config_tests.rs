#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::config::SearchConfig;
use std::time::Duration;

#[test]
fn defaults() {
    let config = SearchConfig::default();
    assert_eq!(config.page_size, 10);
    assert_eq!(config.debounce, Duration::from_millis(300));
    assert_eq!(config.min_query_len, 1);
}

#[test]
fn yaml_overrides_and_partial_defaults() {
    let yaml = r#"
page_size: 25
debounce: "150ms"
"#;
    let config: SearchConfig = serde_saphyr::from_str(yaml).unwrap();
    assert_eq!(config.page_size, 25);
    assert_eq!(config.debounce, Duration::from_millis(150));
    assert_eq!(config.min_query_len, 1);
}

#[test]
fn unknown_fields_are_rejected() {
    let yaml = "page_size: 10\nthrottle: 1s\n";
    assert!(serde_saphyr::from_str::<SearchConfig>(yaml).is_err());
}

#[test]
fn normalized_pulls_values_into_range() {
    let config = SearchConfig {
        page_size: 500,
        debounce: Duration::ZERO,
        min_query_len: 0,
    }
    .normalized();
    assert_eq!(config.page_size, 100);
    assert_eq!(config.min_query_len, 1);

    let config = SearchConfig {
        page_size: 0,
        ..SearchConfig::default()
    }
    .normalized();
    assert_eq!(config.page_size, 1);
}

#[test]
fn serializes_debounce_as_humantime() {
    let json = serde_json::to_value(SearchConfig::default()).unwrap();
    assert_eq!(json["debounce"], "300ms");
}
