use tennis_terminal::h2h::summarize;
use tennis_terminal::state::{
    AppState, Delta, H2hMatch, HistoryPanel, LiveMatch, NewsArticle, NewsPanel, PanelState,
    PlayerNews, PointEntry, Scores, StatRow, apply_delta,
};
use tennis_terminal::view::{
    DETAIL_HINT, INJURY_MARKER, card_lines, h2h_panel_lines, history_panel_lines, match_card,
    match_cards, news_panel_lines, past_match_line, stats_panel_lines,
};

fn bare_match() -> LiveMatch {
    LiveMatch {
        id: "77".to_string(),
        tournament: None,
        player1: None,
        player2: Some("  ".to_string()),
        score1: 0,
        score2: 0,
        status: None,
    }
}

fn past(home: &str, away: &str, home_score: &str, away_score: &str) -> H2hMatch {
    H2hMatch {
        tournament: Some("Wimbledon".to_string()),
        home: Some(home.to_string()),
        away: Some(away.to_string()),
        scores: Some(Scores {
            home: home_score.to_string(),
            away: away_score.to_string(),
        }),
        timestamp: None,
    }
}

#[test]
fn card_uses_placeholders_for_missing_fields() {
    let state = AppState::default();
    let card = match_card(&bare_match(), &state);
    assert_eq!(card.tournament, "Torneio");
    assert_eq!(card.players[0].name, "Jogador 1");
    assert_eq!(card.players[1].name, "Jogador 2");
    assert_eq!(card.players[0].score, 0);
    assert_eq!(card.status, "Em progresso");

    let lines = card_lines(&card);
    assert_eq!(lines.last().map(String::as_str), Some(DETAIL_HINT));
}

#[test]
fn card_marks_flagged_players() {
    let mut state = AppState::default();
    let m = LiveMatch {
        id: "1".to_string(),
        tournament: Some("ATP Basel".to_string()),
        player1: Some("Carlos Alcaraz".to_string()),
        player2: Some("Jannik Sinner".to_string()),
        score1: 1,
        score2: 1,
        status: Some("LIVE".to_string()),
    };
    apply_delta(&mut state, Delta::SetFeed(vec![m]));
    apply_delta(
        &mut state,
        Delta::InjuryAlert {
            player: "Carlos Alcaraz".to_string(),
        },
    );

    let cards = match_cards(&state);
    assert_eq!(cards.len(), 1);
    assert!(cards[0].players[0].injury_alert);
    assert!(!cards[0].players[1].injury_alert);
    let lines = card_lines(&cards[0]);
    assert!(lines[0].contains(INJURY_MARKER));
    assert!(!lines[1].contains(INJURY_MARKER));
}

#[test]
fn stats_panel_states() {
    assert_eq!(
        stats_panel_lines(&PanelState::Failed("boom".into()), "A", "B"),
        vec!["Erro ao carregar estatísticas".to_string()]
    );
    assert_eq!(
        stats_panel_lines(&PanelState::Loaded(Vec::new()), "A", "B"),
        vec!["Sem dados de estatísticas disponíveis".to_string()]
    );
    let rows = vec![StatRow {
        name: "Aces".to_string(),
        home: "7".to_string(),
        away: "4".to_string(),
    }];
    let lines = stats_panel_lines(&PanelState::Loaded(rows), "Sinner", "Alcaraz");
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Sinner"));
    assert!(lines[1].starts_with("Aces"));
}

#[test]
fn h2h_panel_distinguishes_empty_cases() {
    let empty = summarize(&[], "Jannik Sinner", "Carlos Alcaraz");
    assert_eq!(
        h2h_panel_lines(&PanelState::Loaded(empty)),
        vec!["Sem dados de H2H disponíveis".to_string()]
    );

    let unrelated = summarize(
        &[past("Novak Djokovic", "Andy Murray", "3", "0")],
        "Jannik Sinner",
        "Carlos Alcaraz",
    );
    assert_eq!(
        h2h_panel_lines(&PanelState::Loaded(unrelated)),
        vec!["Estes jogadores nunca se enfrentaram".to_string()]
    );
}

#[test]
fn h2h_panel_lists_wins_and_matches() {
    let summary = summarize(
        &[
            past("Jannik Sinner", "Carlos Alcaraz", "3", "1"),
            past("Carlos Alcaraz", "Jannik Sinner", "3", "2"),
            past("Jannik Sinner", "Carlos Alcaraz", "2", "0"),
        ],
        "Jannik Sinner",
        "Carlos Alcaraz",
    );
    let lines = h2h_panel_lines(&PanelState::Loaded(summary));
    assert_eq!(lines[0], "Confrontos Diretos: 3");
    assert_eq!(lines[1], "Jannik Sinner: 2");
    assert_eq!(lines[2], "Carlos Alcaraz: 1");
    assert_eq!(lines.len(), 5 + 3);
}

#[test]
fn past_match_line_shows_result() {
    let line = past_match_line(&past("Jannik Sinner", "Carlos Alcaraz", "1", "1"));
    assert!(line.contains("1 - 1"));
    assert!(line.contains("empate"));
    assert!(line.starts_with("- |"));
}

#[test]
fn history_panel_states() {
    assert_eq!(
        history_panel_lines(&PanelState::Loaded(HistoryPanel::Points(Vec::new())), "A", "B"),
        vec!["Sem histórico disponível".to_string()]
    );
    let points = HistoryPanel::Points(vec![PointEntry {
        point: "15-0".to_string(),
        time: "14:02".to_string(),
    }]);
    let lines = history_panel_lines(&PanelState::Loaded(points), "A", "B");
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("14:02"));

    let per_player = HistoryPanel::PlayerMatches {
        player1: Vec::new(),
        player2: vec![past("Carlos Alcaraz", "Ben Shelton", "2", "0")],
    };
    let lines = history_panel_lines(&PanelState::Loaded(per_player), "Sinner", "Alcaraz");
    assert_eq!(lines[0], "Últimas partidas (Alcaraz)");
    assert_eq!(lines.len(), 2);
}

#[test]
fn news_panel_only_shows_players_with_articles() {
    let panel = NewsPanel {
        player1: "Jannik Sinner".to_string(),
        news1: PlayerNews::default(),
        player2: "Carlos Alcaraz".to_string(),
        news2: PlayerNews {
            articles: vec![NewsArticle {
                title: "Ankle scare".to_string(),
                description: None,
                source: Some("Tennis Daily".to_string()),
            }],
            has_injury_alert: true,
        },
    };
    let lines = news_panel_lines(&PanelState::Loaded(panel));
    assert_eq!(lines[0], "Carlos Alcaraz");
    assert!(lines[1].contains("ALERTA DE LESÃO"));
    assert!(lines.iter().all(|l| !l.contains("Jannik")));
    assert!(lines.iter().any(|l| l.contains("Sem descrição")));
}

#[test]
fn news_panel_without_articles_is_empty_message() {
    let panel = NewsPanel {
        player1: "A".to_string(),
        news1: PlayerNews::default(),
        player2: "B".to_string(),
        news2: PlayerNews::default(),
    };
    assert_eq!(
        news_panel_lines(&PanelState::Loaded(panel)),
        vec!["Sem notícias recentes disponíveis".to_string()]
    );
}
