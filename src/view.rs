//! View data for the terminal front end. Everything here is a pure function
//! of state so the drawing code in `main.rs` only lays out what these return.

use chrono::{DateTime, Local};

use crate::h2h::{self, H2hSummary, MatchOutcome};
use crate::state::{
    AppState, DetailTab, DetailView, H2hMatch, HistoryPanel, LiveMatch, NewsPanel, PanelState,
    PlayerNews, StatRow,
};

pub const LIVE_BADGE: &str = "● AO VIVO";
pub const DETAIL_HINT: &str = "Enter para detalhes";
pub const INJURY_MARKER: &str = "⚠ Alerta";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub name: String,
    pub score: u32,
    pub injury_alert: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCard {
    pub id: String,
    pub tournament: String,
    pub players: [PlayerRow; 2],
    pub status: String,
}

pub fn match_card(m: &LiveMatch, state: &AppState) -> MatchCard {
    let player1 = m.player1_name();
    let player2 = m.player2_name();
    MatchCard {
        id: m.id.clone(),
        tournament: m.tournament_name().to_string(),
        players: [
            PlayerRow {
                name: player1.to_string(),
                score: m.score1,
                injury_alert: state.has_injury_alert(player1),
            },
            PlayerRow {
                name: player2.to_string(),
                score: m.score2,
                injury_alert: state.has_injury_alert(player2),
            },
        ],
        status: m.status_text().to_string(),
    }
}

pub fn match_cards(state: &AppState) -> Vec<MatchCard> {
    state
        .filtered_matches()
        .into_iter()
        .map(|m| match_card(m, state))
        .collect()
}

pub fn card_lines(card: &MatchCard) -> Vec<String> {
    let mut lines = Vec::with_capacity(5);
    for row in &card.players {
        let marker = if row.injury_alert {
            format!("  {INJURY_MARKER}")
        } else {
            String::new()
        };
        lines.push(format!("{:<24} {:>3}{marker}", row.name, row.score));
    }
    lines.push(card.status.clone());
    lines.push(DETAIL_HINT.to_string());
    lines
}

pub fn panel_lines(view: &DetailView, tab: DetailTab) -> Vec<String> {
    let m = &view.match_info;
    match tab {
        DetailTab::Stats => stats_panel_lines(&view.stats, m.player1_name(), m.player2_name()),
        DetailTab::H2h => h2h_panel_lines(&view.h2h),
        DetailTab::History => {
            history_panel_lines(&view.history, m.player1_name(), m.player2_name())
        }
        DetailTab::News => news_panel_lines(&view.news),
    }
}

pub fn stats_panel_lines(
    state: &PanelState<Vec<StatRow>>,
    player1: &str,
    player2: &str,
) -> Vec<String> {
    match state {
        PanelState::NotLoaded => vec![not_loaded()],
        PanelState::Loading => vec!["Carregando estatísticas...".to_string()],
        PanelState::Failed(_) => vec!["Erro ao carregar estatísticas".to_string()],
        PanelState::Loaded(rows) if rows.is_empty() => {
            vec!["Sem dados de estatísticas disponíveis".to_string()]
        }
        PanelState::Loaded(rows) => {
            let mut lines = Vec::with_capacity(rows.len() + 1);
            lines.push(format!("{:<28} {:>14} {:>14}", "Estatística", player1, player2));
            for row in rows {
                lines.push(format!("{:<28} {:>14} {:>14}", row.name, row.home, row.away));
            }
            lines
        }
    }
}

pub fn h2h_panel_lines(state: &PanelState<H2hSummary>) -> Vec<String> {
    match state {
        PanelState::NotLoaded => vec![not_loaded()],
        PanelState::Loading => vec!["Carregando H2H...".to_string()],
        PanelState::Failed(_) => vec!["Erro ao carregar H2H".to_string()],
        PanelState::Loaded(summary) if !summary.has_raw_data() => {
            vec!["Sem dados de H2H disponíveis".to_string()]
        }
        PanelState::Loaded(summary) if summary.direct.is_empty() => {
            vec!["Estes jogadores nunca se enfrentaram".to_string()]
        }
        PanelState::Loaded(summary) => {
            let mut lines = vec![
                format!("Confrontos Diretos: {}", summary.direct.len()),
                format!("{}: {}", summary.player1, summary.player1_wins),
                format!("{}: {}", summary.player2, summary.player2_wins),
                String::new(),
                "Histórico de Confrontos Diretos".to_string(),
            ];
            lines.extend(summary.direct.iter().map(past_match_line));
            lines
        }
    }
}

pub fn history_panel_lines(
    state: &PanelState<HistoryPanel>,
    player1: &str,
    player2: &str,
) -> Vec<String> {
    match state {
        PanelState::NotLoaded => vec![not_loaded()],
        PanelState::Loading => vec!["Carregando histórico...".to_string()],
        PanelState::Failed(_) => vec!["Erro ao carregar histórico".to_string()],
        PanelState::Loaded(HistoryPanel::Points(points)) if points.is_empty() => {
            vec![empty_history()]
        }
        PanelState::Loaded(HistoryPanel::Points(points)) => points
            .iter()
            .map(|p| format!("{:<16} {}", p.point, p.time))
            .collect(),
        PanelState::Loaded(HistoryPanel::PlayerMatches {
            player1: history1,
            player2: history2,
        }) if history1.is_empty() && history2.is_empty() =>
        {
            vec![empty_history()]
        }
        PanelState::Loaded(HistoryPanel::PlayerMatches {
            player1: history1,
            player2: history2,
        }) => {
            let mut lines = Vec::new();
            for (label, matches) in [(player1, history1), (player2, history2)] {
                if matches.is_empty() {
                    continue;
                }
                if !lines.is_empty() {
                    lines.push(String::new());
                }
                lines.push(format!("Últimas partidas ({label})"));
                lines.extend(matches.iter().map(past_match_line));
            }
            lines
        }
    }
}

pub fn news_panel_lines(state: &PanelState<NewsPanel>) -> Vec<String> {
    match state {
        PanelState::NotLoaded => vec![not_loaded()],
        PanelState::Loading => vec!["Carregando notícias...".to_string()],
        PanelState::Failed(_) => vec!["Erro ao carregar notícias".to_string()],
        PanelState::Loaded(panel) => {
            let mut lines = Vec::new();
            for (player, news) in [(&panel.player1, &panel.news1), (&panel.player2, &panel.news2)]
            {
                if news.articles.is_empty() {
                    continue;
                }
                if !lines.is_empty() {
                    lines.push(String::new());
                }
                push_player_news(&mut lines, player, news);
            }
            if lines.is_empty() {
                lines.push("Sem notícias recentes disponíveis".to_string());
            }
            lines
        }
    }
}

fn push_player_news(lines: &mut Vec<String>, player: &str, news: &PlayerNews) {
    lines.push(player.to_string());
    if news.has_injury_alert {
        lines.push("⚠ ALERTA DE LESÃO".to_string());
    }
    for article in &news.articles {
        lines.push(format!("• {}", article.title));
        lines.push(format!(
            "  {}",
            article.description.as_deref().unwrap_or("Sem descrição")
        ));
        lines.push(format!(
            "  {}",
            article.source.as_deref().unwrap_or("Fonte desconhecida")
        ));
    }
}

pub fn past_match_line(m: &H2hMatch) -> String {
    let score = m
        .scores
        .as_ref()
        .map(|s| format!("{} - {}", s.home, s.away))
        .unwrap_or_else(|| "-".to_string());
    let result = match h2h::outcome(m) {
        Some(outcome) => outcome_label(outcome),
        None => "-",
    };
    format!(
        "{} | {} | {} {} {} [{}]",
        m.timestamp.map(format_date).unwrap_or_else(|| "-".to_string()),
        m.tournament.as_deref().unwrap_or("-"),
        m.home.as_deref().unwrap_or("-"),
        score,
        m.away.as_deref().unwrap_or("-"),
        result
    )
}

pub fn outcome_label(outcome: MatchOutcome) -> &'static str {
    match outcome {
        MatchOutcome::HomeWin => "vitória mandante",
        MatchOutcome::AwayWin => "vitória visitante",
        MatchOutcome::Draw => "empate",
    }
}

/// `dd/mm/yyyy` in local time from unix seconds.
pub fn format_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(&Local).format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn not_loaded() -> String {
    "Não carregado".to_string()
}

fn empty_history() -> String {
    "Sem histórico disponível".to_string()
}
