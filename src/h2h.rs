//! Head-to-head reduction: narrows the raw list the backend returns down to
//! direct matchups between two players and counts wins per side.
//!
//! Matching is by name only. Each player is reduced to the lowercased first
//! whitespace token of their name and a raw match counts as direct when one
//! side contains the first token and the other side contains the second.
//! The heuristic accepts false positives (two players sharing a first name
//! fragment) because the feed carries no stable player identifiers.

use crate::state::H2hMatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    HomeWin,
    AwayWin,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct H2hSummary {
    pub player1: String,
    pub player2: String,
    pub raw_count: usize,
    pub direct: Vec<H2hMatch>,
    pub player1_wins: u32,
    pub player2_wins: u32,
}

impl H2hSummary {
    pub fn has_raw_data(&self) -> bool {
        self.raw_count > 0
    }
}

pub fn first_name_token(name: &str) -> String {
    let lowered = name.to_lowercase();
    lowered.split(' ').next().unwrap_or_default().to_string()
}

pub fn is_direct_matchup(m: &H2hMatch, player1_token: &str, player2_token: &str) -> bool {
    let (Some(home), Some(away)) = (m.home.as_deref(), m.away.as_deref()) else {
        return false;
    };
    let home = home.to_lowercase();
    let away = away.to_lowercase();
    (home.contains(player1_token) && away.contains(player2_token))
        || (home.contains(player2_token) && away.contains(player1_token))
}

pub fn filter_direct_matchups(raw: &[H2hMatch], player1: &str, player2: &str) -> Vec<H2hMatch> {
    let p1 = first_name_token(player1);
    let p2 = first_name_token(player2);
    raw.iter()
        .filter(|m| is_direct_matchup(m, &p1, &p2))
        .cloned()
        .collect()
}

/// Leading-integer parse: optional sign, then digits, anything after is
/// ignored. Unparseable input counts as zero; digit runs past `i64`
/// saturate.
pub fn parse_score(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let mut end = 0;
    for (idx, ch) in trimmed.char_indices() {
        let sign = idx == 0 && (ch == '-' || ch == '+');
        if !sign && !ch.is_ascii_digit() {
            break;
        }
        end = idx + ch.len_utf8();
    }
    let lead = &trimmed[..end];
    match lead.parse::<i64>() {
        Ok(value) => value,
        Err(_) if lead.bytes().any(|b| b.is_ascii_digit()) => {
            if lead.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            }
        }
        Err(_) => 0,
    }
}

pub fn outcome(m: &H2hMatch) -> Option<MatchOutcome> {
    let scores = m.scores.as_ref()?;
    let home = parse_score(&scores.home);
    let away = parse_score(&scores.away);
    Some(match home.cmp(&away) {
        std::cmp::Ordering::Greater => MatchOutcome::HomeWin,
        std::cmp::Ordering::Less => MatchOutcome::AwayWin,
        std::cmp::Ordering::Equal => MatchOutcome::Draw,
    })
}

pub fn summarize(raw: &[H2hMatch], player1: &str, player2: &str) -> H2hSummary {
    let direct = filter_direct_matchups(raw, player1, player2);
    let p1 = first_name_token(player1);

    let mut player1_wins = 0;
    let mut player2_wins = 0;
    for m in &direct {
        let player1_home = m
            .home
            .as_deref()
            .is_some_and(|home| home.to_lowercase().contains(&p1));
        match (outcome(m), player1_home) {
            (Some(MatchOutcome::HomeWin), true) | (Some(MatchOutcome::AwayWin), false) => {
                player1_wins += 1;
            }
            (Some(MatchOutcome::HomeWin), false) | (Some(MatchOutcome::AwayWin), true) => {
                player2_wins += 1;
            }
            _ => {}
        }
    }

    H2hSummary {
        player1: player1.to_string(),
        player2: player2.to_string(),
        raw_count: raw.len(),
        direct,
        player1_wins,
        player2_wins,
    }
}
