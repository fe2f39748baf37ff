use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::error::{FetchError, FetchResult};
use crate::http_client::http_client;
use crate::state::{H2hMatch, LiveMatch, NewsArticle, PlayerNews, PointEntry, Scores, StatRow};

const UNKNOWN_API_ERROR: &str = "Erro desconhecido";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

/// Read-only view of the dashboard backend. Every call is one blocking GET.
pub trait TennisApi: Send + Sync {
    fn live_matches(&self) -> FetchResult<Vec<LiveMatch>>;
    fn match_stats(&self, match_id: &str) -> FetchResult<Vec<StatRow>>;
    fn match_h2h(&self, match_id: &str) -> FetchResult<Vec<H2hMatch>>;
    fn players_h2h(&self, player1: &str, player2: &str) -> FetchResult<Vec<H2hMatch>>;
    fn match_history(&self, match_id: &str) -> FetchResult<Vec<PointEntry>>;
    fn player_history(&self, player: &str) -> FetchResult<Vec<H2hMatch>>;
    fn player_news(&self, player: &str) -> FetchResult<PlayerNews>;
    fn health(&self) -> FetchResult<HealthStatus>;
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    base: Url,
}

impl HttpApi {
    pub fn new(base: &str) -> FetchResult<Self> {
        let base = Url::parse(base).map_err(|err| FetchError::Url(format!("{base}: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::Url(format!("{base}: not a base url")));
        }
        Ok(Self { base })
    }

    /// Joins percent-encoded path segments onto the base url.
    pub fn endpoint(&self, segments: &[&str]) -> FetchResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Url(format!("{}: not a base url", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, segments: &[&str]) -> FetchResult<String> {
        let url = self.endpoint(segments)?;
        debug!(%url, "GET");
        let client = http_client()?;
        let resp = client.get(url).send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: api_error_message(&body).unwrap_or(body),
            });
        }
        Ok(body)
    }
}

impl TennisApi for HttpApi {
    fn live_matches(&self) -> FetchResult<Vec<LiveMatch>> {
        let body = self.get(&["api", "live-matches"])?;
        parse_live_matches_json(&body)
    }

    fn match_stats(&self, match_id: &str) -> FetchResult<Vec<StatRow>> {
        let body = self.get(&["api", "match-stats", match_id])?;
        parse_match_stats_json(&body)
    }

    fn match_h2h(&self, match_id: &str) -> FetchResult<Vec<H2hMatch>> {
        let body = self.get(&["api", "match-h2h", match_id])?;
        parse_h2h_json(&body)
    }

    fn players_h2h(&self, player1: &str, player2: &str) -> FetchResult<Vec<H2hMatch>> {
        let body = self.get(&["api", "h2h", player1, player2])?;
        parse_h2h_json(&body)
    }

    fn match_history(&self, match_id: &str) -> FetchResult<Vec<PointEntry>> {
        let body = self.get(&["api", "match-history", match_id])?;
        parse_match_history_json(&body)
    }

    fn player_history(&self, player: &str) -> FetchResult<Vec<H2hMatch>> {
        let body = self.get(&["api", "player-history", player])?;
        parse_player_history_json(&body)
    }

    fn player_news(&self, player: &str) -> FetchResult<PlayerNews> {
        let body = self.get(&["api", "player-news", player])?;
        parse_player_news_json(&body)
    }

    fn health(&self) -> FetchResult<HealthStatus> {
        let body = self.get(&["api", "health"])?;
        parse_health_json(&body)
    }
}

/// The feed envelope must say `success: true`; anything else is treated as a
/// backend failure carrying the envelope's `error` text.
pub fn parse_live_matches_json(raw: &str) -> FetchResult<Vec<LiveMatch>> {
    let root = parse_root(raw)?;
    if !root.get("success").is_some_and(is_truthy) {
        return Err(envelope_error(&root));
    }
    Ok(array_at(&root, "matches")
        .iter()
        .map(parse_live_match)
        .collect())
}

fn parse_live_match(value: &Value) -> LiveMatch {
    LiveMatch {
        id: pick_string(value, &["id", "match_id", "event_id"]).unwrap_or_default(),
        tournament: pick_string(value, &["tournament", "tournament_name"]),
        player1: pick_string(value, &["player1", "home_player"]),
        player2: pick_string(value, &["player2", "away_player"]),
        score1: pick_u32(value, &["score_player1", "home_score"]).unwrap_or(0),
        score2: pick_u32(value, &["score_player2", "away_score"]).unwrap_or(0),
        status: pick_string(value, &["status"]),
    }
}

pub fn parse_match_stats_json(raw: &str) -> FetchResult<Vec<StatRow>> {
    let root = parse_root(raw)?;
    check_envelope(&root)?;
    let rows = root
        .get("stats")
        .and_then(|stats| stats.get("match"))
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .map(|stat| StatRow {
                    name: pick_string(stat, &["name", "title"]).unwrap_or_else(|| "-".into()),
                    home: value_to_string(stat.get("home_team").or_else(|| stat.get("home"))),
                    away: value_to_string(stat.get("away_team").or_else(|| stat.get("away"))),
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(rows)
}

pub fn parse_h2h_json(raw: &str) -> FetchResult<Vec<H2hMatch>> {
    let root = parse_root(raw)?;
    check_envelope(&root)?;
    Ok(array_at(&root, "h2h").iter().map(parse_past_match).collect())
}

pub fn parse_player_history_json(raw: &str) -> FetchResult<Vec<H2hMatch>> {
    let root = parse_root(raw)?;
    check_envelope(&root)?;
    Ok(array_at(&root, "history")
        .iter()
        .map(parse_past_match)
        .collect())
}

fn parse_past_match(value: &Value) -> H2hMatch {
    let scores = value.get("scores").filter(|v| v.is_object()).map(|scores| Scores {
        home: score_to_string(scores.get("home")),
        away: score_to_string(scores.get("away")),
    });
    H2hMatch {
        tournament: pick_string(value, &["tournament_name", "tournament"]),
        home: value.get("home_team").and_then(as_string).filter(|s| !s.is_empty()),
        away: value.get("away_team").and_then(as_string).filter(|s| !s.is_empty()),
        scores,
        timestamp: pick_i64(value, &["timestamp", "start_timestamp"]),
    }
}

pub fn parse_match_history_json(raw: &str) -> FetchResult<Vec<PointEntry>> {
    let root = parse_root(raw)?;
    check_envelope(&root)?;
    Ok(array_at(&root, "history")
        .iter()
        .map(|item| PointEntry {
            point: value_to_string(item.get("point")),
            time: value_to_string(item.get("time")),
        })
        .collect())
}

pub fn parse_player_news_json(raw: &str) -> FetchResult<PlayerNews> {
    let root = parse_root(raw)?;
    check_envelope(&root)?;
    let articles = array_at(&root, "news")
        .iter()
        .map(|article| NewsArticle {
            title: pick_string(article, &["title"]).unwrap_or_default(),
            description: pick_string(article, &["description"]).filter(|s| !s.is_empty()),
            source: pick_string(article, &["source"]).filter(|s| !s.is_empty()),
        })
        .collect();
    Ok(PlayerNews {
        articles,
        has_injury_alert: root.get("has_injury_alert").is_some_and(is_truthy),
    })
}

pub fn parse_health_json(raw: &str) -> FetchResult<HealthStatus> {
    let root = parse_root(raw)?;
    Ok(HealthStatus {
        status: pick_string(&root, &["status"]).unwrap_or_else(|| "unknown".into()),
        message: pick_string(&root, &["message"]).unwrap_or_default(),
    })
}

fn parse_root(raw: &str) -> FetchResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Detail endpoints may omit `success`; only an explicit falsy value fails.
fn check_envelope(root: &Value) -> FetchResult<()> {
    match root.get("success") {
        Some(flag) if !is_truthy(flag) => Err(envelope_error(root)),
        _ => Ok(()),
    }
}

fn envelope_error(root: &Value) -> FetchError {
    FetchError::Api(
        pick_string(root, &["error", "message"]).unwrap_or_else(|| UNKNOWN_API_ERROR.into()),
    )
}

fn api_error_message(raw: &str) -> Option<String> {
    let root: Value = serde_json::from_str(raw.trim()).ok()?;
    pick_string(&root, &["error", "message"])
}

fn array_at<'a>(root: &'a Value, key: &str) -> &'a [Value] {
    root.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty() && s != "false",
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => {
            if *b {
                "sim".to_string()
            } else {
                "não".to_string()
            }
        }
        Some(Value::String(_)) | Some(Value::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

fn score_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(*key)
            && let Some(s) = as_string(v)
        {
            return Some(s);
        }
    }
    None
}

fn pick_u32(value: &Value, keys: &[&str]) -> Option<u32> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_u64() {
                return u32::try_from(num).ok();
            }
            if let Some(num) = v.as_f64() {
                if num >= 0.0 {
                    return Some(num as u32);
                }
            }
            if let Some(s) = v.as_str()
                && let Ok(num) = s.trim().parse::<u32>()
            {
                return Some(num);
            }
        }
    }
    None
}

fn pick_i64(value: &Value, keys: &[&str]) -> Option<i64> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_i64() {
                return Some(num);
            }
            if let Some(num) = v.as_f64() {
                return Some(num as i64);
            }
            if let Some(s) = v.as_str()
                && let Ok(num) = s.trim().parse::<i64>()
            {
                return Some(num);
            }
        }
    }
    None
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => {
            if let Some(Value::String(name)) = map.get("name") {
                return Some(name.trim().to_string());
            }
            if let Some(Value::String(name)) = map.get("shortName") {
                return Some(name.trim().to_string());
            }
            None
        }
        _ => None,
    }
}
