use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::api::TennisApi;
use crate::config::{Config, DetailFetchMode, H2hSource, HistorySource};
use crate::error::FetchResult;
use crate::h2h;
use crate::schedule::PollSchedule;
use crate::state::{
    Delta, DetailRequest, DetailTab, HistoryPanel, LiveMatch, NewsPanel, PanelData,
    ProviderCommand,
};

/// Upper bound on how long the provider blocks waiting for a command, so a
/// schedule that became due is noticed even when the UI is idle.
const MAX_IDLE: Duration = Duration::from_millis(500);

/// Runs the feed poller and the detail loader on a background thread. The
/// thread exits on `ProviderCommand::Shutdown` or when the command channel
/// closes. Jobs already handed to the fetch pool are not cancelled.
pub fn spawn_provider(
    api: Arc<dyn TennisApi>,
    config: Config,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let pool = build_fetch_pool(config.fetch_parallelism);
        let sources = PanelSources::from(&config);
        let mut schedule = PollSchedule::new(config.feed_poll);

        {
            let api = api.clone();
            let tx = tx.clone();
            spawn_job(&pool, move || report_health(api.as_ref(), &tx));
        }

        loop {
            if schedule.is_due(Instant::now()) {
                refresh_feed(&api, &pool, config.news_prefetch, &tx);
                schedule.mark_fetched(Instant::now());
            }

            let wait = schedule.time_until_due(Instant::now()).min(MAX_IDLE);
            match cmd_rx.recv_timeout(wait) {
                Ok(ProviderCommand::RefreshFeed) => {
                    debug!("manual refresh");
                    schedule.trigger_now();
                }
                Ok(ProviderCommand::LoadDetail(request)) => {
                    dispatch_detail(&api, &pool, config.detail_fetch, sources, request, &tx);
                }
                Ok(ProviderCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                    info!("provider stopping");
                    return;
                }
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    })
}

fn report_health(api: &dyn TennisApi, tx: &Sender<Delta>) {
    match api.health() {
        Ok(health) => {
            info!(status = %health.status, "backend health");
            let _ = tx.send(Delta::Log(format!(
                "[INFO] Backend {}: {}",
                health.status, health.message
            )));
        }
        Err(err) => {
            warn!("health check failed: {err}");
            let _ = tx.send(Delta::Log(format!("[WARN] Health check failed: {err}")));
        }
    }
}

fn refresh_feed(
    api: &Arc<dyn TennisApi>,
    pool: &Option<rayon::ThreadPool>,
    news_prefetch: bool,
    tx: &Sender<Delta>,
) {
    let _ = tx.send(Delta::FeedRefreshing);
    match api.live_matches() {
        Ok(matches) => {
            info!(count = matches.len(), "live matches");
            if news_prefetch && !matches.is_empty() {
                prefetch_news(api.as_ref(), pool, &matches, tx);
            }
            let _ = tx.send(Delta::SetFeed(matches));
        }
        Err(err) => {
            warn!("live matches fetch failed: {err}");
            let _ = tx.send(Delta::FeedFailed(err.to_string()));
        }
    }
}

/// Looks up news for every player on the feed so cards can carry injury
/// flags in the same render as the new list.
fn prefetch_news(
    api: &dyn TennisApi,
    pool: &Option<rayon::ThreadPool>,
    matches: &[LiveMatch],
    tx: &Sender<Delta>,
) {
    let players: Vec<String> = matches
        .iter()
        .flat_map(|m| [m.player1_name().to_string(), m.player2_name().to_string()])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    with_fetch_pool(pool, || {
        players
            .par_iter()
            .for_each_with(tx.clone(), |tx, player| match api.player_news(player) {
                Ok(news) if news.has_injury_alert => {
                    let _ = tx.send(Delta::InjuryAlert {
                        player: player.clone(),
                    });
                }
                Ok(_) => {}
                Err(err) => debug!(%player, "news prefetch failed: {err}"),
            });
    });
}

fn dispatch_detail(
    api: &Arc<dyn TennisApi>,
    pool: &Option<rayon::ThreadPool>,
    mode: DetailFetchMode,
    sources: PanelSources,
    request: DetailRequest,
    tx: &Sender<Delta>,
) {
    if request.tabs.is_empty() {
        return;
    }
    debug!(match_id = %request.match_info.id, tabs = ?request.tabs, "loading detail");
    let request = Arc::new(request);
    match mode {
        DetailFetchMode::Concurrent => {
            for tab in request.tabs.iter().copied() {
                let api = api.clone();
                let request = request.clone();
                let tx = tx.clone();
                spawn_job(pool, move || {
                    run_panel_job(api.as_ref(), sources, &request, tab, &tx);
                });
            }
        }
        DetailFetchMode::Sequential => {
            let api = api.clone();
            let tx = tx.clone();
            spawn_job(pool, move || {
                for tab in request.tabs.iter().copied() {
                    run_panel_job(api.as_ref(), sources, &request, tab, &tx);
                }
            });
        }
    }
}

fn run_panel_job(
    api: &dyn TennisApi,
    sources: PanelSources,
    request: &DetailRequest,
    tab: DetailTab,
    tx: &Sender<Delta>,
) {
    let match_id = request.match_info.id.clone();
    let generation = request.generation;
    match load_panel(api, sources, &request.match_info, tab) {
        Ok(data) => {
            if let PanelData::News(news) = &data {
                for (player, flagged) in [
                    (&news.player1, news.news1.has_injury_alert),
                    (&news.player2, news.news2.has_injury_alert),
                ] {
                    if flagged {
                        let _ = tx.send(Delta::InjuryAlert {
                            player: player.clone(),
                        });
                    }
                }
            }
            let _ = tx.send(Delta::PanelLoaded {
                match_id,
                generation,
                data,
            });
        }
        Err(err) => {
            warn!(%match_id, ?tab, "panel load failed: {err}");
            let _ = tx.send(Delta::PanelFailed {
                match_id,
                generation,
                tab,
                reason: err.to_string(),
            });
        }
    }
}

/// Fetches and reduces the data behind one tab.
pub fn load_panel(
    api: &dyn TennisApi,
    sources: PanelSources,
    m: &LiveMatch,
    tab: DetailTab,
) -> FetchResult<PanelData> {
    let player1 = m.player1_name();
    let player2 = m.player2_name();
    match tab {
        DetailTab::Stats => api.match_stats(&m.id).map(PanelData::Stats),
        DetailTab::H2h => {
            let raw = match sources.h2h {
                H2hSource::Match => api.match_h2h(&m.id)?,
                H2hSource::Players => api.players_h2h(player1, player2)?,
            };
            Ok(PanelData::H2h(h2h::summarize(&raw, player1, player2)))
        }
        DetailTab::History => {
            let history = match sources.history {
                HistorySource::Match => HistoryPanel::Points(api.match_history(&m.id)?),
                HistorySource::Player => HistoryPanel::PlayerMatches {
                    player1: api.player_history(player1)?,
                    player2: api.player_history(player2)?,
                },
            };
            Ok(PanelData::History(history))
        }
        DetailTab::News => {
            let news1 = api.player_news(player1)?;
            let news2 = api.player_news(player2)?;
            Ok(PanelData::News(NewsPanel {
                player1: player1.to_string(),
                news1,
                player2: player2.to_string(),
                news2,
            }))
        }
    }
}

/// Endpoint choices for the tabs that have more than one backend route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelSources {
    pub h2h: H2hSource,
    pub history: HistorySource,
}

impl From<&Config> for PanelSources {
    fn from(config: &Config) -> Self {
        Self {
            h2h: config.h2h_source,
            history: config.history_source,
        }
    }
}

fn spawn_job(pool: &Option<rayon::ThreadPool>, job: impl FnOnce() + Send + 'static) {
    if let Some(pool) = pool.as_ref() {
        pool.spawn(job);
    } else {
        thread::spawn(job);
    }
}

fn build_fetch_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|idx| format!("tennis-fetch-{idx}"))
        .build()
        .ok()
}

fn with_fetch_pool<T>(pool: &Option<rayon::ThreadPool>, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}
