//! Risk register view: live search, record table, add dialog, CSV export.
//!
//! Renders straight from the query cache: a loading banner while a fetch is
//! in flight, an error banner with the message when a fetch failed, or the
//! filtered table. The add action is disabled while a mutation is pending
//! so overlapping appends cannot race on the computed id.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use tracing::{error, info};

use parapet_client::{QueryState, RiskQuery};
use parapet_core::export::write_csv;
use parapet_core::{RiskRecord, RiskStatus, Severity, filter};

use super::add_dialog::{AddDialog, DialogAction};

/// Full-screen register page backed by the shared query cache.
pub struct RegisterView {
    query: Arc<RiskQuery>,
    handle: tokio::runtime::Handle,
    export_path: PathBuf,
    search: String,
    search_active: bool,
    table_state: TableState,
    dialog: Option<AddDialog>,
    notice: Option<String>,
}

impl RegisterView {
    /// View over `query`, spawning work on `handle`, exporting to
    /// `export_path`.
    #[must_use]
    pub fn new(query: Arc<RiskQuery>, handle: tokio::runtime::Handle, export_path: PathBuf) -> Self {
        Self {
            query,
            handle,
            export_path,
            search: String::new(),
            search_active: false,
            table_state: TableState::default(),
            dialog: None,
            notice: None,
        }
    }

    /// Whether key events should go to a text input rather than navigation.
    #[must_use]
    pub const fn wants_text_input(&self) -> bool {
        self.search_active || self.dialog.is_some()
    }

    /// Feed a key event to the view.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(dialog) = self.dialog.as_mut() {
            match dialog.handle_key(key) {
                Some(DialogAction::Submit(draft)) => {
                    self.dialog = None;
                    self.spawn_add(draft);
                }
                Some(DialogAction::Cancel) => {
                    self.dialog = None;
                }
                None => {}
            }
            return;
        }

        if self.search_active {
            match key.code {
                KeyCode::Esc => {
                    self.search.clear();
                    self.search_active = false;
                }
                KeyCode::Enter => self.search_active = false,
                KeyCode::Char(c) => self.search.push(c),
                KeyCode::Backspace => {
                    self.search.pop();
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('/') => {
                self.notice = None;
                self.search_active = true;
            }
            KeyCode::Char('a') => {
                self.notice = None;
                // Disabled while a mutation is pending: one append at a time.
                if !self.query.mutation_pending() {
                    self.dialog = Some(AddDialog::new());
                }
            }
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('r') => self.spawn_refresh(),
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            _ => {}
        }
    }

    fn spawn_add(&mut self, draft: parapet_core::RiskDraft) {
        let query = Arc::clone(&self.query);
        self.handle.spawn(async move {
            match query.add(draft).await {
                Ok(record) => info!(id = record.id, "risk added from TUI"),
                Err(err) => error!(%err, "add risk failed"),
            }
        });
    }

    fn spawn_refresh(&self) {
        let query = Arc::clone(&self.query);
        self.handle.spawn(async move {
            query.refresh().await;
        });
    }

    /// Export the *unfiltered* snapshot; the search box never applies here.
    fn export(&mut self) {
        let state = self.query.state();
        let Some(records) = state.records() else {
            self.notice = Some("No data to export.".to_string());
            return;
        };
        self.notice = Some(match self.try_export(records) {
            Ok(true) => format!(
                "Exported {} records to {}",
                records.len(),
                self.export_path.display()
            ),
            Ok(false) => "No data to export.".to_string(),
            Err(err) => format!("Export failed: {err}"),
        });
    }

    fn try_export(&self, records: &[RiskRecord]) -> std::io::Result<bool> {
        if records.is_empty() {
            return Ok(false);
        }
        let file = File::create(&self.export_path)?;
        let mut out = BufWriter::new(file);
        write_csv(records, &mut out)
    }

    fn visible_rows(&self) -> Option<Vec<RiskRecord>> {
        self.query
            .state()
            .records()
            .map(|records| filter::apply(records, &self.search))
    }

    fn select_next(&mut self) {
        let len = self.visible_rows().map_or(0, |rows| rows.len());
        if len == 0 {
            return;
        }
        let next = self.table_state.selected().map_or(0, |i| (i + 1) % len);
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        let len = self.visible_rows().map_or(0, |rows| rows.len());
        if len == 0 {
            return;
        }
        let prev = self
            .table_state
            .selected()
            .map_or(0, |i| (i + len - 1) % len);
        self.table_state.select(Some(prev));
    }

    /// Render the page: search bar, state-dependent body, footer.
    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_search(frame, chunks[0]);

        match self.query.state() {
            QueryState::Loading => {
                let banner = Paragraph::new("Loading live risk data...")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(banner, chunks[1]);
            }
            QueryState::Error(message) => {
                let banner = Paragraph::new(format!("Error fetching data: {message}"))
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Red))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(banner, chunks[1]);
            }
            QueryState::Success(records) => {
                let rows = filter::apply(&records, &self.search);
                self.render_table(frame, chunks[1], &rows);
            }
        }

        self.render_footer(frame, chunks[2]);

        if let Some(dialog) = &self.dialog {
            dialog.render(frame, area);
        }
    }

    fn render_search(&self, frame: &mut Frame<'_>, area: Rect) {
        let style = if self.search_active {
            Style::default().fg(Color::Blue)
        } else {
            Style::default().fg(Color::Gray)
        };
        let input = Paragraph::new(self.search.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(" Search risks (/) "),
        );
        frame.render_widget(input, area);
    }

    fn render_table(&mut self, frame: &mut Frame<'_>, area: Rect, rows: &[RiskRecord]) {
        let header = Row::new(
            ["ID", "Asset", "Threat", "Vulnerability", "Impact", "Likelihood", "Status"]
                .into_iter()
                .map(Cell::from),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let body = rows.iter().map(|record| {
            Row::new(vec![
                Cell::from(record.id.to_string()),
                Cell::from(record.asset.clone()),
                Cell::from(record.threat.clone()),
                Cell::from(record.vuln.clone()),
                severity_cell(record.impact),
                Cell::from(record.likelihood.as_str()),
                status_cell(record.status),
            ])
        });

        let table = Table::new(
            body,
            [
                Constraint::Length(4),
                Constraint::Percentage(20),
                Constraint::Percentage(22),
                Constraint::Percentage(26),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Min(12),
            ],
        )
        .header(header)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Risk Register ({}) ", rows.len())),
        );

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_footer(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut spans = vec![Span::styled(
            "/ search   a add   e export   r refresh   j/k move   q quit",
            Style::default().fg(Color::DarkGray),
        )];
        if self.query.mutation_pending() {
            spans.push(Span::styled(
                "   Adding risk...",
                Style::default().fg(Color::Yellow),
            ));
        } else if let Some(notice) = &self.notice {
            spans.push(Span::styled(
                format!("   {notice}"),
                Style::default().fg(Color::Green),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn severity_cell(severity: Severity) -> Cell<'static> {
    let color = match severity {
        Severity::Low => Color::Green,
        Severity::Medium => Color::Yellow,
        Severity::High => Color::Red,
    };
    Cell::from(severity.as_str()).style(Style::default().fg(color))
}

fn status_cell(status: RiskStatus) -> Cell<'static> {
    let color = match status {
        RiskStatus::Open => Color::Red,
        RiskStatus::MitigationInProgress => Color::Yellow,
        RiskStatus::Closed => Color::Green,
    };
    Cell::from(status.as_str()).style(Style::default().fg(color))
}
