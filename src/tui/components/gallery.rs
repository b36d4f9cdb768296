//! Home screen: searchable list of enabled photos.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::{ACCENT, DANGER, DIMMED, SELECTED_BG, Toggle, id_label, notice};
use crate::core::{Gallery, Photo};

/// Render the gallery screen into `area`.
pub fn render_gallery(frame: &mut Frame, area: Rect, gallery: &Gallery) {
    let failure = gallery.state().failure();
    let chunks = Layout::vertical([
        Constraint::Length(1),                            // Title
        Constraint::Length(3),                            // Search
        Constraint::Length(u16::from(failure.is_some())), // Error banner
        Constraint::Length(1),                            // Button
        Constraint::Min(1),                               // List
    ])
    .split(area);

    let visible = gallery.visible();
    let hidden = gallery.disabled().len();

    let mut title = vec![Span::styled(
        "Photo Gallery",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )];
    title.push(Span::styled(
        format!("  {} shown", visible.len()),
        Style::default().fg(DIMMED),
    ));
    if gallery.state().is_loading() {
        title.push(Span::styled("  loading…", Style::default().fg(DIMMED)));
    } else if let Some(at) = gallery.fetched_at() {
        title.push(Span::styled(
            format!("  fetched {}", at.with_timezone(&chrono::Local).format("%H:%M:%S")),
            Style::default().fg(DIMMED),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), chunks[0]);

    let search_text = if gallery.search().is_empty() {
        Line::from(Span::styled(
            "Search by title...",
            Style::default().fg(DIMMED),
        ))
    } else {
        Line::from(Span::styled(
            gallery.search().to_string(),
            Style::default().fg(Color::White),
        ))
    };
    let search = Paragraph::new(search_text).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    );
    frame.render_widget(search, chunks[1]);

    if let Some(reason) = failure {
        let banner = Line::from(vec![
            Span::styled(
                format!("Couldn't load photos: {reason}"),
                Style::default().fg(DANGER),
            ),
            Span::styled("  Ctrl+R to retry", Style::default().fg(DIMMED)),
        ]);
        frame.render_widget(Paragraph::new(banner), chunks[2]);
    }

    let button = Line::from(vec![
        Span::styled(
            " View Disabled Photos ",
            Style::default().fg(Color::White).bg(ACCENT),
        ),
        Span::styled(format!("  Tab · {hidden} hidden"), Style::default().fg(DIMMED)),
    ]);
    frame.render_widget(Paragraph::new(button), chunks[3]);

    let list_area = chunks[4];
    if visible.is_empty() {
        let text = if gallery.state().is_loading() {
            "Loading photos…".to_string()
        } else if gallery.photos().is_empty() {
            "No photos".to_string()
        } else if gallery.search().is_empty() {
            "Every photo is disabled".to_string()
        } else {
            format!("No photos match \"{}\"", gallery.search())
        };
        let (paragraph, rect) = notice(text, list_area);
        frame.render_widget(paragraph, rect);
        return;
    }

    let selected = gallery.selected_index();
    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, photo)| photo_row(photo, i == selected))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(DIMMED)),
    );
    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, list_area, &mut state);
}

fn photo_row(photo: &Photo, is_selected: bool) -> ListItem<'static> {
    let style = if is_selected {
        Style::default()
            .bg(SELECTED_BG)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let meta = if is_selected {
        Style::default().bg(SELECTED_BG).fg(DIMMED)
    } else {
        Style::default().fg(DIMMED)
    };

    let mut spans = vec![Span::styled(
        format!(" {} ", if is_selected { "▸" } else { " " }),
        style,
    )];
    spans.extend(Toggle::new(true).spans());
    spans.push(Span::styled(" ", style));
    spans.push(Span::styled(photo.title.clone(), style));
    spans.push(Span::styled("  ", meta));
    spans.push(Span::styled(
        id_label(Some((photo.album_id, photo.id)), ""),
        meta,
    ));
    ListItem::new(Line::from(spans))
}
