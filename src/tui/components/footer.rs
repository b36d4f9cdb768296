//! Bottom line: key hints, last status message and build version.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{ACCENT, DIMMED};
use crate::build_info;
use crate::core::Route;

fn hints(route: &Route) -> &'static [(&'static str, &'static str)] {
    match route {
        Route::Home { .. } => &[
            ("↑↓", "navigate"),
            ("Enter", "disable"),
            ("Tab", "disabled"),
            ("Ctrl+R", "reload"),
            ("Esc", "clear/quit"),
        ],
        Route::Disabled => &[
            ("↑↓", "navigate"),
            ("Enter", "re-enable"),
            ("Ctrl+R", "reload"),
            ("Esc", "back"),
        ],
    }
}

/// Render the footer into a single-line `area`.
#[allow(clippy::cast_possible_truncation)]
pub fn render_footer(frame: &mut Frame, area: Rect, route: &Route, status: Option<&str>) {
    let version = build_info::version_string();
    let chunks = Layout::horizontal([
        Constraint::Min(1),
        Constraint::Length(version.chars().count() as u16 + 1),
    ])
    .split(area);

    let line = if let Some(status) = status {
        Line::from(Span::styled(status.to_string(), Style::default().fg(Color::White)))
    } else {
        let mut spans = Vec::new();
        for (key, action) in hints(route) {
            spans.push(Span::styled(*key, Style::default().fg(ACCENT)));
            spans.push(Span::styled(format!(" {action}  "), Style::default().fg(DIMMED)));
        }
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line), chunks[0]);

    let version = Paragraph::new(Line::from(Span::styled(
        version,
        Style::default().fg(DIMMED),
    )))
    .alignment(ratatui::layout::Alignment::Right);
    frame.render_widget(version, chunks[1]);
}
