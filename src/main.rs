use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use tracing::{error, info};

use tennis_terminal::api::HttpApi;
use tennis_terminal::config::Config;
use tennis_terminal::filter::filter_label;
use tennis_terminal::persist;
use tennis_terminal::provider::spawn_provider;
use tennis_terminal::state::{
    self, AppState, DetailTab, FeedStatus, FeedView, ProviderCommand, Screen, apply_delta,
    tab_label,
};
use tennis_terminal::view::{self, LIVE_BADGE, MatchCard};

const CARD_HEIGHT: u16 = 7;
const CARD_MIN_WIDTH: u16 = 40;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(state: AppState, cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_active {
            self.on_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_refresh(),
            _ => match self.state.screen {
                Screen::Feed => self.on_feed_key(key),
                Screen::Detail => self.on_detail_key(key),
            },
        }
    }

    fn on_feed_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('f') | KeyCode::Char('F') => self.state.cycle_filter(),
            KeyCode::Char('/') => self.state.search_active = true,
            KeyCode::Enter | KeyCode::Char('d') => self.open_detail(),
            _ => {}
        }
    }

    fn on_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') => self.state.close_detail(),
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.state.next_tab(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.state.prev_tab(),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_detail(true),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_detail(false),
            KeyCode::Char(ch @ '1'..='4') => {
                let idx = ch as usize - '1' as usize;
                if let Some(tab) = DetailTab::from_index(idx) {
                    self.state.set_tab(tab);
                }
            }
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.state.search_active = false,
            KeyCode::Backspace => self.state.pop_search_char(),
            KeyCode::Char(ch) => self.state.push_search_char(ch),
            _ => {}
        }
    }

    fn request_refresh(&mut self) {
        if self.cmd_tx.send(ProviderCommand::RefreshFeed).is_err() {
            self.state.push_log("[WARN] Refresh request failed");
        } else {
            self.state.push_log("[INFO] Refresh requested");
        }
    }

    fn open_detail(&mut self) {
        let Some(request) = self.state.open_selected_detail() else {
            self.state.push_log("[INFO] No match selected for details");
            return;
        };
        if request.tabs.is_empty() {
            return;
        }
        if self
            .cmd_tx
            .send(ProviderCommand::LoadDetail(request))
            .is_err()
        {
            self.state.push_log("[WARN] Match details request failed");
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing()?;

    let config = Config::from_env();
    info!(api_base = %config.api_base, poll = ?config.feed_poll, "starting");
    let api = HttpApi::new(&config.api_base).context("invalid TENNIS_API_BASE")?;

    let mut state = AppState::new(config.detail_cache);
    persist::load_into_state(&mut state);

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let _provider = spawn_provider(Arc::new(api), config, tx, cmd_rx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state, cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let _ = app.cmd_tx.send(ProviderCommand::Shutdown);
    persist::save_from_state(&mut app.state);

    if let Err(err) = res {
        error!("terminal error: {err}");
        eprintln!("error: {err}");
    }
    info!("shut down");
    Ok(())
}

/// Tracing goes to a file; the terminal belongs to the dashboard.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("tennis_terminal.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tennis_terminal=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        persist::save_from_state(&mut app.state);

        terminal.draw(|f| ui(f, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_feed(frame, chunks[1], state);

    let footer = Paragraph::new(footer_text(state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if state.screen == Screen::Detail {
        render_detail(frame, chunks[1], state);
    }

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> Text<'static> {
    let status_style = match state.feed_status {
        FeedStatus::Online => Style::default().fg(Color::Green),
        FeedStatus::Error(_) => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Yellow),
    };
    let search = if state.search.is_empty() && !state.search_active {
        String::new()
    } else {
        let cursor = if state.search_active { "_" } else { "" };
        format!(" | Busca: {}{cursor}", state.search)
    };
    let line1 = Line::from(vec![
        Span::styled(
            " TÊNIS AO VIVO ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("| "),
        Span::styled(state.status_text(), status_style),
        Span::raw(format!(
            " | Atualizado: {} | Filtro: {}{search}",
            state.last_updated_text(),
            filter_label(state.filter)
        )),
    ]);
    Text::from(vec![line1, Line::from("")])
}

fn footer_text(state: &AppState) -> String {
    let hints = match (state.search_active, state.screen) {
        (true, _) => "Type to search | Enter/Esc Done | Backspace Delete",
        (false, Screen::Feed) => {
            "j/k/↑/↓ Move | Enter/d Details | r Refresh | f Filter | / Search | ? Help | q Quit"
        }
        (false, Screen::Detail) => {
            "Tab/←/→ or 1-4 Tabs | j/k Scroll | b/Esc Back | r Refresh | ? Help | q Quit"
        }
    };
    let logs = console_text(state);
    format!("{hints}\n{logs}")
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_feed(frame: &mut Frame, area: Rect, state: &AppState) {
    let cards = match state.feed_view() {
        FeedView::Loading => {
            let loading = Paragraph::new("Carregando partidas ao vivo...")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(loading, area);
            return;
        }
        FeedView::NoMatches => {
            let empty = Paragraph::new("Nenhuma partida ao vivo no momento")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, area);
            return;
        }
        FeedView::NoFilterResults => {
            let empty = Paragraph::new("Nenhuma partida corresponde ao filtro")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, area);
            return;
        }
        FeedView::Cards(_) => view::match_cards(state),
    };

    if area.height < CARD_HEIGHT {
        let small = Paragraph::new("Card grid needs more height")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(small, area);
        return;
    }

    let columns = (area.width / CARD_MIN_WIDTH).max(1) as usize;
    let visible_rows = (area.height / CARD_HEIGHT) as usize;
    let total_rows = cards.len().div_ceil(columns);
    let selected_row = state.selected / columns;
    let (start_row, end_row) = visible_range(selected_row, total_rows, visible_rows);

    for (i, row) in (start_row..end_row).enumerate() {
        let row_area = Rect {
            x: area.x,
            y: area.y + (i as u16) * CARD_HEIGHT,
            width: area.width,
            height: CARD_HEIGHT,
        };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(row_area);

        for (col, cell) in cells.iter().enumerate() {
            let idx = row * columns + col;
            let Some(card) = cards.get(idx) else {
                break;
            };
            render_card(frame, *cell, card, idx == state.selected);
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &MatchCard, selected: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(format!(" {} ", card.tournament))
        .title_bottom(Line::from(Span::styled(
            format!(" {LIVE_BADGE} "),
            Style::default().fg(Color::Red),
        )))
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<Line> = view::card_lines(card)
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let style = match i {
                0 | 1 if card.players[i].injury_alert => Style::default().fg(Color::Yellow),
                0 | 1 => Style::default().add_modifier(Modifier::BOLD),
                _ => Style::default().fg(Color::DarkGray),
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(detail) = state.detail.as_ref() else {
        return;
    };
    let popup = centered_rect(80, 80, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(
            " {} | {} ",
            detail.match_info.title(),
            detail.match_info.tournament_name()
        ))
        .borders(Borders::ALL);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let titles: Vec<Line> = DetailTab::ALL
        .iter()
        .map(|tab| {
            let label = tab_label(*tab);
            if detail.is_loading(*tab) {
                Line::from(format!("{label} …"))
            } else {
                Line::from(label)
            }
        })
        .collect();
    let tabs = Tabs::new(titles)
        .select(detail.active_tab.index())
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(tabs, rows[0]);

    let body = view::panel_lines(detail, detail.active_tab).join("\n");
    let panel = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .scroll((detail.scroll, 0));
    frame.render_widget(panel, rows[1]);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Tennis Terminal - Help",
        "",
        "Global:",
        "  r            Refresh now",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Cards:",
        "  j/k or ↑/↓   Move",
        "  Enter / d    Open details",
        "  f            Cycle tournament filter",
        "  /            Search players or tournament",
        "",
        "Details:",
        "  Tab / ← / →  Switch tab",
        "  1-4          Jump to tab",
        "  j/k          Scroll",
        "  b / Esc      Close",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
