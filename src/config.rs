use std::env;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
const DEFAULT_FEED_POLL_SECS: u64 = 60;
const MIN_FEED_POLL_SECS: u64 = 10;
const DEFAULT_FETCH_PARALLELISM: usize = 4;

/// Whether reopening a detail view reuses panels that already loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailCachePolicy {
    #[default]
    Refetch,
    Reuse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailFetchMode {
    #[default]
    Concurrent,
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum H2hSource {
    /// `/api/match-h2h/{id}`
    #[default]
    Match,
    /// `/api/h2h/{player1}/{player2}`
    Players,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistorySource {
    /// `/api/match-history/{id}`
    #[default]
    Match,
    /// `/api/player-history/{player}` for both players
    Player,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub feed_poll: Duration,
    pub detail_cache: DetailCachePolicy,
    pub detail_fetch: DetailFetchMode,
    pub h2h_source: H2hSource,
    pub history_source: HistorySource,
    pub news_prefetch: bool,
    pub fetch_parallelism: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unknown or malformed values
    /// fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };

        let api_base = get("TENNIS_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let feed_poll_secs = get("FEED_POLL_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_FEED_POLL_SECS)
            .max(MIN_FEED_POLL_SECS);
        let detail_cache = match get("DETAIL_CACHE").map(|v| v.to_lowercase()).as_deref() {
            Some("reuse") => DetailCachePolicy::Reuse,
            _ => DetailCachePolicy::Refetch,
        };
        let detail_fetch = match get("DETAIL_FETCH").map(|v| v.to_lowercase()).as_deref() {
            Some("sequential") => DetailFetchMode::Sequential,
            _ => DetailFetchMode::Concurrent,
        };
        let h2h_source = match get("H2H_SOURCE").map(|v| v.to_lowercase()).as_deref() {
            Some("players") => H2hSource::Players,
            _ => H2hSource::Match,
        };
        let history_source = match get("HISTORY_SOURCE").map(|v| v.to_lowercase()).as_deref() {
            Some("player") => HistorySource::Player,
            _ => HistorySource::Match,
        };
        let news_prefetch = get("NEWS_PREFETCH")
            .map(|val| !matches!(val.to_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);
        let fetch_parallelism = get("FETCH_PARALLELISM")
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(DEFAULT_FETCH_PARALLELISM)
            .clamp(1, 16);

        Self {
            api_base,
            feed_poll: Duration::from_secs(feed_poll_secs),
            detail_cache,
            detail_fetch,
            h2h_source,
            history_source,
            news_prefetch,
            fetch_parallelism,
        }
    }
}
