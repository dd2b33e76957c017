//! Main application state and TUI event loop.
//!
//! [`App`] owns the theme, view mode and what the body currently shows:
//! the login prompt, a loading panel, or the outcome of the single fetch.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame, Terminal,
};

use trends_runtime::loader::{DashboardLoader, LoadHandle, LoadOutcome};
use trends_runtime::session::SessionState;

use crate::chart_view;
use crate::components::header::Header;
use crate::components::status;
use crate::table_view;
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// How a loaded report is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Stacked weekly bar chart with legend.
    Chart,
    /// One row per week, one column per series.
    Table,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Chart => Self::Table,
            Self::Table => Self::Chart,
        }
    }
}

// ── DisplayState ──────────────────────────────────────────────────────────────

/// What the body of the screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    /// No token; the login prompt is shown.
    LoggedOut,
    /// The fetch is in flight.
    Loading,
    /// The fetch finished, successfully or not.
    Outcome(LoadOutcome),
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Chart or table.
    pub view_mode: ViewMode,
    /// Title shown in the header and on the chart block.
    pub title: String,
    /// Analytics view id shown in the header.
    pub view_id: Option<String>,
    /// Current body contents.
    pub state: DisplayState,
    /// Login state; a token rejected by the API logs the session out.
    pub session: SessionState,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(
        theme_name: &str,
        view_mode: ViewMode,
        title: String,
        view_id: Option<String>,
    ) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            title,
            view_id,
            state: DisplayState::LoggedOut,
            session: SessionState::LoggedOut,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until the user quits.
    ///
    /// When `session` is logged in, the loader is started once and its
    /// outcome polled without blocking on each 250 ms tick. A logged-out
    /// session never fetches.
    ///
    /// The loop exits on `q`, `Q`, or `Ctrl+C`.
    pub async fn run(mut self, session: SessionState, loader: DashboardLoader) -> io::Result<()> {
        self.session = session;
        let mut pending: Option<LoadHandle> = match self.session.token() {
            Some(token) => {
                tracing::info!("session logged in; starting fetch");
                self.state = DisplayState::Loading;
                Some(loader.start(token.clone()))
            }
            None => {
                tracing::info!("session logged out; waiting for a token");
                self.state = DisplayState::LoggedOut;
                None
            }
        };

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if let Some(handle) = pending.as_mut() {
                if let Some(outcome) = handle.try_take() {
                    self.apply_outcome(outcome);
                    pending = None;
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        if let Some(handle) = pending {
            handle.abort();
        }

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── State transitions ─────────────────────────────────────────────────────

    /// React to a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab => self.view_mode = self.view_mode.toggled(),
            _ => {}
        }
    }

    /// Store the result of the fetch. A rejected token logs the session out.
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) {
        match &outcome {
            LoadOutcome::Ready(report) => {
                tracing::debug!(weeks = report.weeks.len(), "report received by the UI");
            }
            LoadOutcome::Unauthorized(reason) => self.session.login_failed(reason),
            LoadOutcome::FetchFailed(_) | LoadOutcome::InvalidData(_) => {}
        }
        self.state = DisplayState::Outcome(outcome);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the header and the current body into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(frame.area());

        let mut header = Header::new(&self.title, self.view_id.as_deref(), &self.theme);
        if let DisplayState::Outcome(LoadOutcome::Ready(report)) = &self.state {
            header = header.with_weeks(report.weeks.len());
        }
        frame.render_widget(Paragraph::new(header.to_lines()), chunks[0]);

        let body = chunks[1];
        match &self.state {
            DisplayState::LoggedOut => {
                status::render_login_required(frame, body, &self.title, None, &self.theme)
            }
            DisplayState::Outcome(LoadOutcome::Unauthorized(reason)) => {
                status::render_login_required(
                    frame,
                    body,
                    &self.title,
                    Some(reason.as_str()),
                    &self.theme,
                )
            }
            DisplayState::Loading => status::render_loading(frame, body, &self.title, &self.theme),
            DisplayState::Outcome(LoadOutcome::FetchFailed(message)) => status::render_failed(
                frame,
                body,
                &self.title,
                "Could not fetch analytics",
                message,
                &self.theme,
            ),
            DisplayState::Outcome(LoadOutcome::InvalidData(message)) => status::render_failed(
                frame,
                body,
                &self.title,
                "Analytics rows could not be aggregated",
                message,
                &self.theme,
            ),
            DisplayState::Outcome(LoadOutcome::Ready(report)) if report.is_empty() => {
                status::render_no_data(frame, body, &self.title, &self.theme)
            }
            DisplayState::Outcome(LoadOutcome::Ready(report)) => match self.view_mode {
                ViewMode::Chart => {
                    chart_view::render_chart_view(frame, body, &self.title, report, &self.theme)
                }
                ViewMode::Table => {
                    table_view::render_table_view(frame, body, &self.title, report, &self.theme)
                }
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
