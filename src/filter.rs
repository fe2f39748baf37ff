use crate::state::LiveMatch;

const GRAND_SLAM_KEYWORDS: &[&str] = &["australian", "french", "wimbledon", "us open"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TournamentFilter {
    #[default]
    All,
    Atp,
    Challenger,
    GrandSlam,
}

impl TournamentFilter {
    pub fn next(self) -> Self {
        match self {
            TournamentFilter::All => TournamentFilter::Atp,
            TournamentFilter::Atp => TournamentFilter::Challenger,
            TournamentFilter::Challenger => TournamentFilter::GrandSlam,
            TournamentFilter::GrandSlam => TournamentFilter::All,
        }
    }

    pub fn accepts(self, tournament: &str) -> bool {
        match self {
            TournamentFilter::All => true,
            TournamentFilter::Atp => contains_ascii_ci(tournament, "atp"),
            TournamentFilter::Challenger => contains_ascii_ci(tournament, "challenger"),
            TournamentFilter::GrandSlam => GRAND_SLAM_KEYWORDS
                .iter()
                .any(|kw| contains_ascii_ci(tournament, kw)),
        }
    }
}

pub fn filter_label(filter: TournamentFilter) -> &'static str {
    match filter {
        TournamentFilter::All => "Todos",
        TournamentFilter::Atp => "ATP",
        TournamentFilter::Challenger => "Challenger",
        TournamentFilter::GrandSlam => "Grand Slam",
    }
}

pub fn matches_search(m: &LiveMatch, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    [m.player1_name(), m.player2_name(), m.tournament_name()]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
}

pub fn filter_matches<'a>(
    matches: &'a [LiveMatch],
    filter: TournamentFilter,
    search: &str,
) -> Vec<&'a LiveMatch> {
    matches
        .iter()
        .filter(|m| filter.accepts(m.tournament_name()) && matches_search(m, search))
        .collect()
}

/// Case-insensitive ASCII substring search without allocating a lowercased copy.
fn contains_ascii_ci(haystack: &str, needle: &str) -> bool {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.len() > h.len() {
        return false;
    }
    if n.is_empty() {
        return true;
    }
    h.windows(n.len())
        .any(|window| window.iter().zip(n).all(|(a, b)| a.eq_ignore_ascii_case(b)))
}
