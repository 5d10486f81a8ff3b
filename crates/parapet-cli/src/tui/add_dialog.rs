//! Overlay dialog for adding a risk record.
//!
//! Opened with `a` from the register view. Tab/arrow keys move between
//! fields, Left/Right cycle the severity pickers, Enter submits, Esc
//! cancels. There is deliberately no status field: created records always
//! start `Open`.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use parapet_core::{RiskDraft, Severity};

/// The action the dialog wants the caller to take.
pub enum DialogAction {
    /// Commit a new record built from the typed fields.
    Submit(RiskDraft),
    /// The user cancelled; close the overlay.
    Cancel,
}

/// Which input line currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Asset,
    Threat,
    Vuln,
    Impact,
    Likelihood,
}

impl Field {
    const fn next(self) -> Self {
        match self {
            Self::Asset => Self::Threat,
            Self::Threat => Self::Vuln,
            Self::Vuln => Self::Impact,
            Self::Impact => Self::Likelihood,
            Self::Likelihood => Self::Asset,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Asset => Self::Likelihood,
            Self::Threat => Self::Asset,
            Self::Vuln => Self::Threat,
            Self::Impact => Self::Vuln,
            Self::Likelihood => Self::Impact,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Threat => "Threat",
            Self::Vuln => "Vulnerability",
            Self::Impact => "Impact",
            Self::Likelihood => "Likelihood",
        }
    }

    const fn is_severity(self) -> bool {
        matches!(self, Self::Impact | Self::Likelihood)
    }
}

/// State of the add-risk overlay.
pub struct AddDialog {
    asset: String,
    threat: String,
    vuln: String,
    impact: Severity,
    likelihood: Severity,
    focus: Field,
}

impl AddDialog {
    /// Fresh dialog with empty text fields and medium severities.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            asset: String::new(),
            threat: String::new(),
            vuln: String::new(),
            impact: Severity::Medium,
            likelihood: Severity::Medium,
            focus: Field::Asset,
        }
    }

    /// Feed a key event to the dialog.
    ///
    /// Returns `Some(DialogAction)` when the dialog is complete (the caller
    /// should close the overlay), or `None` while the user is still typing.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<DialogAction> {
        match key.code {
            KeyCode::Esc => Some(DialogAction::Cancel),
            KeyCode::Enter => {
                if self.asset.trim().is_empty() {
                    // Nothing typed yet; close silently.
                    Some(DialogAction::Cancel)
                } else {
                    Some(DialogAction::Submit(self.draft()))
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                None
            }
            KeyCode::Left | KeyCode::Right => {
                match self.focus {
                    Field::Impact => self.impact = self.impact.cycled(),
                    Field::Likelihood => self.likelihood = self.likelihood.cycled(),
                    _ => {}
                }
                None
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.focused_text_mut() {
                    text.push(c);
                }
                None
            }
            KeyCode::Backspace => {
                if let Some(text) = self.focused_text_mut() {
                    text.pop();
                }
                None
            }
            _ => None,
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Asset => Some(&mut self.asset),
            Field::Threat => Some(&mut self.threat),
            Field::Vuln => Some(&mut self.vuln),
            Field::Impact | Field::Likelihood => None,
        }
    }

    /// The draft the dialog would submit right now.
    #[must_use]
    pub fn draft(&self) -> RiskDraft {
        RiskDraft::new(
            self.asset.trim(),
            self.threat.trim(),
            self.vuln.trim(),
            self.impact,
            self.likelihood,
        )
    }

    /// Render the overlay centered in `area`.
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let width = area.width.min(60);
        let height = 9;
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Add risk ")
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let fields = [
            (Field::Asset, self.asset.as_str()),
            (Field::Threat, self.threat.as_str()),
            (Field::Vuln, self.vuln.as_str()),
        ];
        for (i, (field, value)) in fields.into_iter().enumerate() {
            frame.render_widget(self.field_line(field, value), rows[i]);
        }
        frame.render_widget(
            self.field_line(Field::Impact, self.impact.as_str()),
            rows[3],
        );
        frame.render_widget(
            self.field_line(Field::Likelihood, self.likelihood.as_str()),
            rows[4],
        );

        let hint = Paragraph::new(Line::from(Span::styled(
            "Tab: next field   \u{2190}/\u{2192}: severity   Enter: add   Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(hint, rows[6]);
    }

    fn field_line(&self, field: Field, value: &str) -> Paragraph<'static> {
        let focused = self.focus == field;
        let marker = if focused { "\u{25b8} " } else { "  " };
        let label_style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value_text = if field.is_severity() {
            format!("\u{2190} {value} \u{2192}")
        } else if value.is_empty() && focused {
            "_".to_string()
        } else {
            value.to_string()
        };
        Paragraph::new(Line::from(vec![
            Span::raw(marker.to_string()),
            Span::styled(format!("{:<14}", field.label()), label_style),
            Span::raw(value_text),
        ]))
    }
}

impl Default for AddDialog {
    fn default() -> Self {
        Self::new()
    }
}
