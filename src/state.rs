use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::config::DetailCachePolicy;
use crate::filter::{self, TournamentFilter};
use crate::h2h::H2hSummary;

pub const TOURNAMENT_PLACEHOLDER: &str = "Torneio";
pub const PLAYER1_PLACEHOLDER: &str = "Jogador 1";
pub const PLAYER2_PLACEHOLDER: &str = "Jogador 2";
pub const STATUS_PLACEHOLDER: &str = "Em progresso";

const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveMatch {
    pub id: String,
    pub tournament: Option<String>,
    pub player1: Option<String>,
    pub player2: Option<String>,
    pub score1: u32,
    pub score2: u32,
    pub status: Option<String>,
}

impl LiveMatch {
    pub fn tournament_name(&self) -> &str {
        non_empty(self.tournament.as_deref()).unwrap_or(TOURNAMENT_PLACEHOLDER)
    }

    pub fn player1_name(&self) -> &str {
        non_empty(self.player1.as_deref()).unwrap_or(PLAYER1_PLACEHOLDER)
    }

    pub fn player2_name(&self) -> &str {
        non_empty(self.player2.as_deref()).unwrap_or(PLAYER2_PLACEHOLDER)
    }

    pub fn status_text(&self) -> &str {
        non_empty(self.status.as_deref()).unwrap_or(STATUS_PLACEHOLDER)
    }

    pub fn title(&self) -> String {
        format!("{} vs {}", self.player1_name(), self.player2_name())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRow {
    pub name: String,
    pub home: String,
    pub away: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub home: String,
    pub away: String,
}

/// One past match as returned by the head-to-head and player-history
/// endpoints. Team names are optional because the backend passes the
/// upstream payload through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct H2hMatch {
    pub tournament: Option<String>,
    pub home: Option<String>,
    pub away: Option<String>,
    pub scores: Option<Scores>,
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointEntry {
    pub point: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerNews {
    pub articles: Vec<NewsArticle>,
    pub has_injury_alert: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsPanel {
    pub player1: String,
    pub news1: PlayerNews,
    pub player2: String,
    pub news2: PlayerNews,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryPanel {
    Points(Vec<PointEntry>),
    PlayerMatches {
        player1: Vec<H2hMatch>,
        player2: Vec<H2hMatch>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState<T> {
    NotLoaded,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for PanelState<T> {
    fn default() -> Self {
        Self::NotLoaded
    }
}

impl<T> PanelState<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// A panel that never started or that failed is fetched again when its
    /// view is reopened.
    pub fn needs_fetch(&self) -> bool {
        matches!(self, Self::NotLoaded | Self::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailTab {
    Stats,
    H2h,
    History,
    News,
}

impl DetailTab {
    pub const ALL: [DetailTab; 4] = [
        DetailTab::Stats,
        DetailTab::H2h,
        DetailTab::History,
        DetailTab::News,
    ];

    pub fn index(self) -> usize {
        match self {
            DetailTab::Stats => 0,
            DetailTab::H2h => 1,
            DetailTab::History => 2,
            DetailTab::News => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub fn tab_label(tab: DetailTab) -> &'static str {
    match tab {
        DetailTab::Stats => "Estatísticas",
        DetailTab::H2h => "H2H",
        DetailTab::History => "Histórico",
        DetailTab::News => "Notícias",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelData {
    Stats(Vec<StatRow>),
    H2h(H2hSummary),
    History(HistoryPanel),
    News(NewsPanel),
}

impl PanelData {
    pub fn tab(&self) -> DetailTab {
        match self {
            PanelData::Stats(_) => DetailTab::Stats,
            PanelData::H2h(_) => DetailTab::H2h,
            PanelData::History(_) => DetailTab::History,
            PanelData::News(_) => DetailTab::News,
        }
    }
}

/// The tabbed view for one match. `generation` ties in-flight responses to
/// the open that requested them.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub match_info: LiveMatch,
    pub generation: u64,
    pub active_tab: DetailTab,
    pub scroll: u16,
    pub stats: PanelState<Vec<StatRow>>,
    pub h2h: PanelState<H2hSummary>,
    pub history: PanelState<HistoryPanel>,
    pub news: PanelState<NewsPanel>,
}

impl DetailView {
    pub fn new(match_info: LiveMatch, generation: u64) -> Self {
        Self {
            match_info,
            generation,
            active_tab: DetailTab::Stats,
            scroll: 0,
            stats: PanelState::NotLoaded,
            h2h: PanelState::NotLoaded,
            history: PanelState::NotLoaded,
            news: PanelState::NotLoaded,
        }
    }

    pub fn needs_fetch(&self, tab: DetailTab) -> bool {
        match tab {
            DetailTab::Stats => self.stats.needs_fetch(),
            DetailTab::H2h => self.h2h.needs_fetch(),
            DetailTab::History => self.history.needs_fetch(),
            DetailTab::News => self.news.needs_fetch(),
        }
    }

    pub fn is_loading(&self, tab: DetailTab) -> bool {
        match tab {
            DetailTab::Stats => self.stats.is_loading(),
            DetailTab::H2h => self.h2h.is_loading(),
            DetailTab::History => self.history.is_loading(),
            DetailTab::News => self.news.is_loading(),
        }
    }

    pub fn mark_loading(&mut self, tab: DetailTab) {
        match tab {
            DetailTab::Stats => self.stats = PanelState::Loading,
            DetailTab::H2h => self.h2h = PanelState::Loading,
            DetailTab::History => self.history = PanelState::Loading,
            DetailTab::News => self.news = PanelState::Loading,
        }
    }

    pub fn apply_loaded(&mut self, data: PanelData) {
        match data {
            PanelData::Stats(rows) => self.stats = PanelState::Loaded(rows),
            PanelData::H2h(summary) => self.h2h = PanelState::Loaded(summary),
            PanelData::History(history) => self.history = PanelState::Loaded(history),
            PanelData::News(news) => self.news = PanelState::Loaded(news),
        }
    }

    pub fn apply_failed(&mut self, tab: DetailTab, reason: String) {
        match tab {
            DetailTab::Stats => self.stats = PanelState::Failed(reason),
            DetailTab::H2h => self.h2h = PanelState::Failed(reason),
            DetailTab::History => self.history = PanelState::Failed(reason),
            DetailTab::News => self.news = PanelState::Failed(reason),
        }
    }
}

/// Work the provider has to do after a detail view opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub match_info: LiveMatch,
    pub generation: u64,
    pub tabs: Vec<DetailTab>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    Starting,
    Refreshing,
    Online,
    Empty,
    Error(String),
}

pub fn status_label(status: &FeedStatus) -> &'static str {
    match status {
        FeedStatus::Starting => "Carregando...",
        FeedStatus::Refreshing => "Atualizando...",
        FeedStatus::Online => "Online",
        FeedStatus::Empty => "Nenhuma partida ao vivo",
        FeedStatus::Error(_) => "Erro ao conectar",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Feed,
    Detail,
}

/// What the card area should show right now.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedView<'a> {
    Loading,
    NoMatches,
    NoFilterResults,
    Cards(Vec<&'a LiveMatch>),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub feed_status: FeedStatus,
    pub matches: Vec<LiveMatch>,
    pub last_updated: Option<DateTime<Local>>,
    pub selected: usize,
    pub filter: TournamentFilter,
    pub search: String,
    pub search_active: bool,
    pub detail_policy: DetailCachePolicy,
    pub detail: Option<DetailView>,
    pub detail_cache: HashMap<String, DetailView>,
    pub injury_flags: HashMap<String, bool>,
    pub injury_flags_dirty: bool,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    next_generation: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DetailCachePolicy::default())
    }
}

impl AppState {
    pub fn new(detail_policy: DetailCachePolicy) -> Self {
        Self {
            screen: Screen::Feed,
            feed_status: FeedStatus::Starting,
            matches: Vec::with_capacity(32),
            last_updated: None,
            selected: 0,
            filter: TournamentFilter::All,
            search: String::new(),
            search_active: false,
            detail_policy,
            detail: None,
            detail_cache: HashMap::new(),
            injury_flags: HashMap::new(),
            injury_flags_dirty: false,
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            help_overlay: false,
            next_generation: 1,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        if self.logs.len() >= LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(msg.into());
    }

    pub fn status_text(&self) -> &'static str {
        status_label(&self.feed_status)
    }

    pub fn last_updated_text(&self) -> String {
        self.last_updated
            .map(|ts| ts.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string())
    }

    pub fn filtered_matches(&self) -> Vec<&LiveMatch> {
        filter::filter_matches(&self.matches, self.filter, &self.search)
    }

    pub fn feed_view(&self) -> FeedView<'_> {
        match self.feed_status {
            FeedStatus::Empty | FeedStatus::Error(_) => return FeedView::NoMatches,
            FeedStatus::Starting | FeedStatus::Refreshing if self.matches.is_empty() => {
                return FeedView::Loading;
            }
            _ => {}
        }
        let filtered = self.filtered_matches();
        if filtered.is_empty() {
            FeedView::NoFilterResults
        } else {
            FeedView::Cards(filtered)
        }
    }

    pub fn selected_match(&self) -> Option<&LiveMatch> {
        self.filtered_matches().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let total = self.filtered_matches().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1).min(total - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.clamp_selection();
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search.push(ch);
        self.clamp_selection();
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
        self.clamp_selection();
    }

    pub fn has_injury_alert(&self, player: &str) -> bool {
        self.injury_flags.get(player).copied().unwrap_or(false)
    }

    pub fn mark_injury_alert(&mut self, player: &str) {
        if !self.has_injury_alert(player) {
            self.injury_flags.insert(player.to_string(), true);
            self.injury_flags_dirty = true;
        }
    }

    pub fn open_selected_detail(&mut self) -> Option<DetailRequest> {
        let selected = self.selected_match()?.clone();
        Some(self.open_detail(selected))
    }

    /// Opens the detail view for `match_info` and reports which tabs still
    /// have to be fetched. Under `Reuse` a previously closed view of the same
    /// match is restored with its generation, so responses that were still
    /// in flight when it closed land in it.
    pub fn open_detail(&mut self, match_info: LiveMatch) -> DetailRequest {
        if let Some(current) = self.detail.take() {
            self.stash_detail(current);
        }

        let restored = match self.detail_policy {
            DetailCachePolicy::Reuse => self.detail_cache.remove(&match_info.id),
            DetailCachePolicy::Refetch => None,
        };
        let mut view = match restored {
            Some(mut view) => {
                view.match_info = match_info;
                view.active_tab = DetailTab::Stats;
                view.scroll = 0;
                view
            }
            None => {
                let generation = self.next_generation;
                self.next_generation += 1;
                DetailView::new(match_info, generation)
            }
        };

        let tabs: Vec<DetailTab> = DetailTab::ALL
            .into_iter()
            .filter(|tab| view.needs_fetch(*tab))
            .collect();
        for tab in &tabs {
            view.mark_loading(*tab);
        }

        let request = DetailRequest {
            match_info: view.match_info.clone(),
            generation: view.generation,
            tabs,
        };
        self.detail = Some(view);
        self.screen = Screen::Detail;
        request
    }

    pub fn close_detail(&mut self) {
        if let Some(view) = self.detail.take() {
            self.stash_detail(view);
        }
        self.screen = Screen::Feed;
    }

    fn stash_detail(&mut self, view: DetailView) {
        if self.detail_policy == DetailCachePolicy::Reuse {
            self.detail_cache.insert(view.match_info.id.clone(), view);
        }
    }

    pub fn set_tab(&mut self, tab: DetailTab) {
        if let Some(view) = self.detail.as_mut() {
            view.active_tab = tab;
            view.scroll = 0;
        }
    }

    pub fn next_tab(&mut self) {
        if let Some(tab) = self.detail.as_ref().map(|v| v.active_tab.next()) {
            self.set_tab(tab);
        }
    }

    pub fn prev_tab(&mut self) {
        if let Some(tab) = self.detail.as_ref().map(|v| v.active_tab.prev()) {
            self.set_tab(tab);
        }
    }

    pub fn scroll_detail(&mut self, down: bool) {
        if let Some(view) = self.detail.as_mut() {
            view.scroll = if down {
                view.scroll.saturating_add(1)
            } else {
                view.scroll.saturating_sub(1)
            };
        }
    }

    fn detail_target(&mut self, match_id: &str, generation: u64) -> Option<&mut DetailView> {
        let open_matches = self
            .detail
            .as_ref()
            .is_some_and(|v| v.match_info.id == match_id && v.generation == generation);
        if open_matches {
            return self.detail.as_mut();
        }
        self.detail_cache
            .get_mut(match_id)
            .filter(|v| v.generation == generation)
    }

    fn clamp_selection(&mut self) {
        let total = self.filtered_matches().len();
        self.selected = self.selected.min(total.saturating_sub(1));
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    FeedRefreshing,
    SetFeed(Vec<LiveMatch>),
    FeedFailed(String),
    InjuryAlert {
        player: String,
    },
    PanelLoaded {
        match_id: String,
        generation: u64,
        data: PanelData,
    },
    PanelFailed {
        match_id: String,
        generation: u64,
        tab: DetailTab,
        reason: String,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    RefreshFeed,
    LoadDetail(DetailRequest),
    Shutdown,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::FeedRefreshing => {
            state.feed_status = FeedStatus::Refreshing;
        }
        Delta::SetFeed(matches) => {
            // Cached views only survive while their match is still live.
            state
                .detail_cache
                .retain(|id, _| matches.iter().any(|m| &m.id == id));
            if matches.is_empty() {
                state.matches.clear();
                state.feed_status = FeedStatus::Empty;
            } else {
                state.matches = matches;
                state.feed_status = FeedStatus::Online;
                state.last_updated = Some(Local::now());
            }
            state.clamp_selection();
        }
        Delta::FeedFailed(reason) => {
            state.matches.clear();
            state.selected = 0;
            state.push_log(format!("[WARN] Live matches error: {reason}"));
            state.feed_status = FeedStatus::Error(reason);
        }
        Delta::InjuryAlert { player } => {
            if !state.has_injury_alert(&player) {
                state.push_log(format!("[ALERT] Injury news: {player}"));
            }
            state.mark_injury_alert(&player);
        }
        Delta::PanelLoaded {
            match_id,
            generation,
            data,
        } => {
            if let Some(view) = state.detail_target(&match_id, generation) {
                view.apply_loaded(data);
            }
        }
        Delta::PanelFailed {
            match_id,
            generation,
            tab,
            reason,
        } => {
            let applied = match state.detail_target(&match_id, generation) {
                Some(view) => {
                    view.apply_failed(tab, reason.clone());
                    true
                }
                None => false,
            };
            if applied {
                state.push_log(format!("[WARN] {} error: {reason}", tab_label(tab)));
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
