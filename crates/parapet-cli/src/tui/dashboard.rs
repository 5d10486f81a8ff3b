//! Dashboard page: framework coverage gauges, domain bar chart, and the
//! live status breakdown computed from the current snapshot.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Gauge, Paragraph},
};

use parapet_client::QueryState;
use parapet_core::summary::{StatusBreakdown, domain_coverage, framework_coverage};

/// Render the dashboard into `area` from the current query state.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &QueryState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(area);

    render_framework_cards(frame, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    render_domain_chart(frame, columns[0]);
    render_status_breakdown(frame, columns[1], state);
}

fn render_framework_cards(frame: &mut Frame<'_>, area: Rect) {
    let coverage = framework_coverage();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    for (card, fc) in cards.iter().zip(coverage) {
        let color = if fc.percent >= 75 {
            Color::Green
        } else if fc.percent >= 60 {
            Color::Yellow
        } else {
            Color::Red
        };
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", fc.framework)),
            )
            .gauge_style(Style::default().fg(color))
            .percent(fc.percent);
        frame.render_widget(gauge, *card);
    }
}

fn render_domain_chart(frame: &mut Frame<'_>, area: Rect) {
    let coverage = domain_coverage();
    let data: Vec<(&str, u64)> = coverage
        .iter()
        .map(|dc| (dc.domain, u64::from(dc.percent)))
        .collect();
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Compliance by Domain "),
        )
        .bar_width(8)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Blue))
        .value_style(Style::default().fg(Color::White))
        .data(&data);
    frame.render_widget(chart, area);
}

fn render_status_breakdown(frame: &mut Frame<'_>, area: Rect, state: &QueryState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Overall Status ");

    let body = match state {
        QueryState::Loading => Paragraph::new("Loading live risk data...")
            .style(Style::default().fg(Color::DarkGray)),
        QueryState::Error(message) => Paragraph::new(format!("Error fetching data: {message}"))
            .style(Style::default().fg(Color::Red)),
        QueryState::Success(records) => {
            let breakdown = StatusBreakdown::of(records);
            Paragraph::new(vec![
                breakdown_line("Open", breakdown.open, Color::Red),
                breakdown_line("Mitigation in progress", breakdown.in_progress, Color::Yellow),
                breakdown_line("Closed", breakdown.closed, Color::Green),
                Line::default(),
                Line::from(Span::styled(
                    format!("{} tracked risks", breakdown.total()),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        }
    };
    frame.render_widget(body.block(block), area);
}

fn breakdown_line(label: &str, count: usize, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled("\u{25a0} ", Style::default().fg(color)),
        Span::raw(format!("{label:<24}")),
        Span::raw(count.to_string()),
    ])
}
