use std::collections::HashMap;
use std::time::Duration;

use tennis_terminal::config::{
    Config, DetailCachePolicy, DetailFetchMode, H2hSource, HistorySource,
};

fn config_from(pairs: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_without_environment() {
    let config = Config::default();
    assert_eq!(config.api_base, "http://127.0.0.1:5000");
    assert_eq!(config.feed_poll, Duration::from_secs(60));
    assert_eq!(config.detail_cache, DetailCachePolicy::Refetch);
    assert_eq!(config.detail_fetch, DetailFetchMode::Concurrent);
    assert_eq!(config.h2h_source, H2hSource::Match);
    assert_eq!(config.history_source, HistorySource::Match);
    assert!(config.news_prefetch);
    assert_eq!(config.fetch_parallelism, 4);
}

#[test]
fn overrides_are_read_case_insensitively() {
    let config = config_from(&[
        ("TENNIS_API_BASE", " http://tennis.local:8080 "),
        ("FEED_POLL_SECS", "30"),
        ("DETAIL_CACHE", "Reuse"),
        ("DETAIL_FETCH", "SEQUENTIAL"),
        ("H2H_SOURCE", "players"),
        ("HISTORY_SOURCE", "player"),
        ("NEWS_PREFETCH", "off"),
        ("FETCH_PARALLELISM", "8"),
    ]);
    assert_eq!(config.api_base, "http://tennis.local:8080");
    assert_eq!(config.feed_poll, Duration::from_secs(30));
    assert_eq!(config.detail_cache, DetailCachePolicy::Reuse);
    assert_eq!(config.detail_fetch, DetailFetchMode::Sequential);
    assert_eq!(config.h2h_source, H2hSource::Players);
    assert_eq!(config.history_source, HistorySource::Player);
    assert!(!config.news_prefetch);
    assert_eq!(config.fetch_parallelism, 8);
}

#[test]
fn out_of_range_values_are_clamped() {
    let config = config_from(&[("FEED_POLL_SECS", "1"), ("FETCH_PARALLELISM", "0")]);
    assert_eq!(config.feed_poll, Duration::from_secs(10));
    assert_eq!(config.fetch_parallelism, 1);

    let config = config_from(&[("FETCH_PARALLELISM", "500")]);
    assert_eq!(config.fetch_parallelism, 16);
}

#[test]
fn malformed_values_fall_back_to_defaults() {
    let config = config_from(&[
        ("FEED_POLL_SECS", "soon"),
        ("DETAIL_CACHE", "sometimes"),
        ("TENNIS_API_BASE", "   "),
    ]);
    assert_eq!(config.feed_poll, Duration::from_secs(60));
    assert_eq!(config.detail_cache, DetailCachePolicy::Refetch);
    assert_eq!(config.api_base, "http://127.0.0.1:5000");
}
