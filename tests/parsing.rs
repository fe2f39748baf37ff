use std::fs;
use std::path::PathBuf;

use tennis_terminal::api::{
    parse_h2h_json, parse_health_json, parse_live_matches_json, parse_match_history_json,
    parse_match_stats_json, parse_player_history_json, parse_player_news_json,
};
use tennis_terminal::error::FetchError;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_live_matches_fixture() {
    let raw = read_fixture("live_matches.json");
    let matches = parse_live_matches_json(&raw).expect("fixture should parse");
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0].id, "11873401");
    assert_eq!(matches[0].player1_name(), "Jannik Sinner");
    assert_eq!(matches[0].score1, 1);
    assert_eq!(matches[0].score2, 1);
    assert_eq!(matches[0].status_text(), "LIVE");
    assert_eq!(matches[1].id, "11873402");
    assert_eq!(matches[1].tournament_name(), "Challenger Lima");
}

#[test]
fn live_match_missing_fields_use_placeholders() {
    let raw = read_fixture("live_matches.json");
    let matches = parse_live_matches_json(&raw).expect("fixture should parse");
    let bare = &matches[2];
    assert_eq!(bare.tournament_name(), "Torneio");
    assert_eq!(bare.player1_name(), "Jogador 1");
    assert_eq!(bare.player2_name(), "Jogador 2");
    assert_eq!(bare.score1, 0);
    assert_eq!(bare.score2, 0);
    assert_eq!(bare.status_text(), "Em progresso");
}

#[test]
fn live_matches_failure_envelope_is_an_error() {
    let raw = read_fixture("live_matches_failure.json");
    match parse_live_matches_json(&raw) {
        Err(FetchError::Api(message)) => {
            assert_eq!(message, "Erro ao conectar com a API: timeout");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[test]
fn live_matches_without_success_flag_is_an_error() {
    match parse_live_matches_json(r#"{"matches": []}"#) {
        Err(FetchError::Api(message)) => assert_eq!(message, "Erro desconhecido"),
        other => panic!("expected api error, got {other:?}"),
    }
}

#[test]
fn live_matches_empty_list_is_ok() {
    let matches = parse_live_matches_json(r#"{"success": true, "matches": []}"#)
        .expect("empty feed should parse");
    assert!(matches.is_empty());
}

#[test]
fn live_matches_invalid_json_is_decode_error() {
    assert!(matches!(
        parse_live_matches_json("{not json"),
        Err(FetchError::Decode(_))
    ));
}

#[test]
fn parses_match_stats_fixture() {
    let raw = read_fixture("match_stats.json");
    let rows = parse_match_stats_json(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].name, "Aces");
    assert_eq!(rows[0].home, "7");
    assert_eq!(rows[0].away, "4");
    assert_eq!(rows[1].away, "-");
    assert_eq!(rows[2].name, "-");
    assert_eq!(rows[2].home, "61%");
}

#[test]
fn match_stats_without_rows_is_empty() {
    let rows = parse_match_stats_json(r#"{"success": true, "stats": {}}"#).expect("parse");
    assert!(rows.is_empty());
}

#[test]
fn parses_h2h_fixture() {
    let raw = read_fixture("match_h2h.json");
    let rows = parse_h2h_json(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].tournament.as_deref(), Some("Wimbledon"));
    assert_eq!(rows[0].home.as_deref(), Some("Carlos Alcaraz"));
    assert_eq!(rows[0].away.as_deref(), Some("Jannik Sinner"));
    let scores = rows[1].scores.as_ref().expect("scores");
    assert_eq!(scores.home, "3");
    assert_eq!(scores.away, "2");
    assert_eq!(rows[1].timestamp, Some(1694217600));
    assert!(rows[3].away.is_none());
    assert!(rows[3].timestamp.is_none());
}

#[test]
fn player_history_reads_history_array() {
    let raw = r#"{"success": true, "history": [
        {"tournament": "Basel", "home_team": {"shortName": "J. Sinner"},
         "away_team": {"name": "Ben Shelton"}, "scores": {"home": 2, "away": 0}}
    ]}"#;
    let rows = parse_player_history_json(raw).expect("parse");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].home.as_deref(), Some("J. Sinner"));
    assert_eq!(rows[0].tournament.as_deref(), Some("Basel"));
}

#[test]
fn parses_match_history_fixture() {
    let raw = read_fixture("match_history.json");
    let points = parse_match_history_json(&raw).expect("fixture should parse");
    assert_eq!(points.len(), 3);
    assert_eq!(points[0].point, "15-0");
    assert_eq!(points[0].time, "14:02");
    assert_eq!(points[2].time, "-");
}

#[test]
fn parses_player_news_fixture() {
    let raw = read_fixture("player_news.json");
    let news = parse_player_news_json(&raw).expect("fixture should parse");
    assert!(news.has_injury_alert);
    assert_eq!(news.articles.len(), 2);
    assert_eq!(news.articles[0].source.as_deref(), Some("Tennis Daily"));
    assert!(news.articles[1].description.is_none());
}

#[test]
fn player_news_without_flag_is_not_alerted() {
    let news = parse_player_news_json(r#"{"success": true, "news": []}"#).expect("parse");
    assert!(!news.has_injury_alert);
    assert!(news.articles.is_empty());
}

#[test]
fn parses_health_payload() {
    let health =
        parse_health_json(r#"{"status": "healthy", "message": "API funcionando"}"#).expect("parse");
    assert_eq!(health.status, "healthy");
    assert_eq!(health.message, "API funcionando");
}

fn assert_backend_failure<T: std::fmt::Debug>(result: Result<T, FetchError>) {
    match result {
        Err(FetchError::Api(message)) => assert_eq!(message, "Erro ao buscar estatísticas"),
        other => panic!("expected api error, got {other:?}"),
    }
}

#[test]
fn detail_failure_envelope_is_an_error_for_every_endpoint() {
    let raw = read_fixture("detail_failure.json");
    assert_backend_failure(parse_match_stats_json(&raw));
    assert_backend_failure(parse_h2h_json(&raw));
    assert_backend_failure(parse_player_history_json(&raw));
    assert_backend_failure(parse_match_history_json(&raw));
    assert_backend_failure(parse_player_news_json(&raw));
}

#[test]
fn detail_failure_without_message_uses_generic_text() {
    match parse_h2h_json(r#"{"success": 0}"#) {
        Err(FetchError::Api(message)) => assert_eq!(message, "Erro desconhecido"),
        other => panic!("expected api error, got {other:?}"),
    }
}

#[test]
fn detail_payload_without_success_key_still_parses() {
    let rows = parse_h2h_json(r#"{"h2h": [{"home_team": "A", "away_team": "B"}]}"#)
        .expect("lenient envelope");
    assert_eq!(rows.len(), 1);
    let news = parse_player_news_json(r#"{"news": []}"#).expect("lenient envelope");
    assert!(news.articles.is_empty());
}
