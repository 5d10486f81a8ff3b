//! Navigation shell and event loop for the parapet TUI.
//!
//! A sidebar selects one of five pages; the event loop alternates between
//! draining terminal input and driving the current-thread runtime so
//! fetch/mutate tasks make progress between frames while the UI stays
//! responsive.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
};

use parapet_client::RiskQuery;
use parapet_core::summary::AUDIT_READINESS_PERCENT;

use crate::cmd::Session;

use super::dashboard;
use super::register::RegisterView;

/// The five pages of the navigation shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Checklists,
    Risks,
    Reports,
    Settings,
}

impl Page {
    /// All pages in sidebar order.
    pub const ALL: [Self; 5] = [
        Self::Dashboard,
        Self::Checklists,
        Self::Risks,
        Self::Reports,
        Self::Settings,
    ];

    const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Checklists => "Checklist Generator",
            Self::Risks => "Risk Register",
            Self::Reports => "Reports",
            Self::Settings => "Settings",
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::Dashboard => Self::Checklists,
            Self::Checklists => Self::Risks,
            Self::Risks => Self::Reports,
            Self::Reports => Self::Settings,
            Self::Settings => Self::Dashboard,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Dashboard => Self::Settings,
            Self::Checklists => Self::Dashboard,
            Self::Risks => Self::Checklists,
            Self::Reports => Self::Risks,
            Self::Settings => Self::Reports,
        }
    }
}

/// Top-level TUI state.
struct App {
    page: Page,
    query: Arc<RiskQuery>,
    register_view: RegisterView,
    should_quit: bool,
}

impl App {
    fn new(query: Arc<RiskQuery>, register_view: RegisterView) -> Self {
        Self {
            page: Page::Dashboard,
            query,
            register_view,
            should_quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Text inputs on the register page swallow everything first.
        if self.page == Page::Risks && self.register_view.wants_text_input() {
            self.register_view.handle_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.page = self.page.next(),
            KeyCode::BackTab => self.page = self.page.prev(),
            KeyCode::Char(c @ '1'..='5') => {
                let index = (c as usize) - ('1' as usize);
                self.page = Page::ALL[index];
            }
            _ => {
                if self.page == Page::Risks {
                    self.register_view.handle_key(key);
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(24), Constraint::Min(40)])
            .split(frame.area());

        self.render_sidebar(frame, columns[0]);

        match self.page {
            Page::Dashboard => dashboard::render(frame, columns[1], &self.query.state()),
            Page::Risks => self.register_view.render(frame, columns[1]),
            page => render_stub(frame, columns[1], page),
        }
    }

    fn render_sidebar(&self, frame: &mut Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(7), Constraint::Length(3)])
            .split(area);

        let items: Vec<ListItem<'_>> = Page::ALL
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let selected = *page == self.page;
                let style = if selected {
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {} ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(page.title(), style),
                ]))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" parapet ")
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        );
        frame.render_widget(list, rows[0]);

        let readiness = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Audit Readiness "),
            )
            .gauge_style(Style::default().fg(Color::Blue))
            .percent(AUDIT_READINESS_PERCENT);
        frame.render_widget(readiness, rows[1]);
    }
}

fn render_stub(frame: &mut Frame<'_>, area: Rect, page: Page) {
    let body = Paragraph::new("This feature is in development.")
        .style(Style::default().fg(Color::DarkGray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", page.title())),
        );
    frame.render_widget(body, area);
}

/// Launch the full-screen dashboard for `project_root`.
pub fn run_tui(project_root: &Path) -> Result<()> {
    let session = Session::open(project_root)?;
    let tick = Duration::from_millis(session.config().tui.tick_ms.max(10));
    let export_path = project_root.join(&session.config().export.path);

    let query = Arc::clone(session.query());
    let register_view = RegisterView::new(
        Arc::clone(&query),
        session.runtime().handle().clone(),
        export_path,
    );

    // Kick off the initial load; both live pages render from this cache.
    session.runtime().spawn({
        let query = Arc::clone(&query);
        async move {
            query.refresh().await;
        }
    });

    let mut terminal = setup_terminal().context("failed to initialize terminal")?;
    let mut app = App::new(query, register_view);
    let result = run_loop(&mut terminal, &mut app, &session, tick);
    restore_terminal(&mut terminal)?;
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    session: &Session,
    tick: Duration,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| app.render(frame))?;

        // Drain pending input, then let spawned fetch/mutate tasks run for
        // one tick on the current-thread runtime.
        while crossterm::event::poll(Duration::ZERO)? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
        session.runtime().block_on(tokio::time::sleep(tick));
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
