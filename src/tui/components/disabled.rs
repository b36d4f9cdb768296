//! Review screen: the photos that are currently hidden.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::{DANGER, DIMMED, SELECTED_BG, Toggle, id_label, notice};
use crate::core::{DisabledReview, ReviewEntry};

/// Render the disabled-photos screen into `area`.
pub fn render_disabled(frame: &mut Frame, area: Rect, review: &DisabledReview) {
    let failure = review.state().failure();
    let unmatched = review.unmatched();
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title
        Constraint::Length(u16::from(failure.is_some() || unmatched > 0)),
        Constraint::Min(1), // List
    ])
    .split(area);

    let entries = review.entries();
    let mut title = vec![
        Span::styled(
            "Disabled Photos",
            Style::default().fg(DANGER).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} hidden", review.disabled().len()),
            Style::default().fg(DIMMED),
        ),
    ];
    if review.state().is_loading() {
        title.push(Span::styled("  loading…", Style::default().fg(DIMMED)));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), chunks[0]);

    if let Some(reason) = failure {
        let banner = Line::from(vec![
            Span::styled(
                format!("Couldn't load photos: {reason}"),
                Style::default().fg(DANGER),
            ),
            Span::styled(
                if entries.iter().any(|e| e.photo.is_some()) {
                    "  showing last loaded list"
                } else {
                    "  showing keys only"
                },
                Style::default().fg(DIMMED),
            ),
        ]);
        frame.render_widget(Paragraph::new(banner), chunks[1]);
    } else if unmatched > 0 {
        let note = Span::styled(
            format!("{unmatched} hidden key(s) match no fetched photo"),
            Style::default().fg(DIMMED),
        );
        frame.render_widget(Paragraph::new(Line::from(note)), chunks[1]);
    }

    if entries.is_empty() {
        let text = if review.state().is_loading() {
            "Loading photos…"
        } else {
            "No disabled photos"
        };
        let (paragraph, rect) = notice(text, chunks[2]);
        frame.render_widget(paragraph, rect);
        return;
    }

    let selected = review.selected_index();
    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| entry_row(entry, i == selected))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(DIMMED)),
    );
    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, chunks[2], &mut state);
}

fn entry_row(entry: &ReviewEntry, is_selected: bool) -> ListItem<'static> {
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

    let title = entry
        .photo
        .as_ref()
        .map_or_else(|| format!("Photo {}", entry.key), |p| p.title.clone());

    let mut spans = vec![Span::styled(
        format!(" {} ", if is_selected { "▸" } else { " " }),
        style,
    )];
    spans.extend(Toggle::new(false).spans());
    spans.push(Span::styled(" ", style));
    spans.push(Span::styled(title, style));
    spans.push(Span::styled("  ", meta));
    spans.push(Span::styled(id_label(entry.ids(), entry.key.as_str()), meta));
    if is_selected {
        spans.push(Span::styled("  Enter: Re-enable", meta));
    }
    ListItem::new(Line::from(spans))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::core::photo::photo;
    use crate::core::{DisabledStore, FixedPhotoSource, PhotoKey, Storage};

    fn screen(review: &DisabledReview) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal
            .draw(|f| render_disabled(f, f.area(), review))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn review_with(dir: &tempfile::TempDir, keys: &[PhotoKey]) -> DisabledReview {
        let store = Arc::new(DisabledStore::open(Storage::with_root(
            dir.path().to_path_buf(),
        )));
        for key in keys {
            store.add(key.clone()).unwrap();
        }
        DisabledReview::new(store)
    }

    #[tokio::test]
    async fn lists_hidden_photos_by_title() {
        let dir = tempfile::tempdir().unwrap();
        let mut review = review_with(&dir, &[PhotoKey::new(1, 2)]);
        review
            .activate(&FixedPhotoSource::new(vec![photo(1, 1, "A"), photo(1, 2, "beta")]))
            .await;

        let text = screen(&review);
        assert!(text.contains("Disabled Photos"));
        assert!(text.contains("beta"));
        assert!(text.contains("Re-enable"));
    }

    #[tokio::test]
    async fn failed_fetch_lists_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut review = review_with(&dir, &[PhotoKey::new(3, 9)]);
        review.activate(&FixedPhotoSource::failing("offline")).await;

        let text = screen(&review);
        assert!(text.contains("showing keys only"));
        assert!(text.contains("Photo 3-9"));
        assert!(text.contains("ID: 9  Album ID: 3"));
    }

    #[tokio::test]
    async fn failed_reload_still_shows_titles() {
        let dir = tempfile::tempdir().unwrap();
        let mut review = review_with(&dir, &[PhotoKey::new(1, 2)]);
        let source = FixedPhotoSource::new(vec![photo(1, 2, "beta")]);
        review.activate(&source).await;
        source.fail("offline");
        review.activate(&source).await;

        let text = screen(&review);
        assert!(text.contains("showing last loaded list"));
        assert!(text.contains("beta"));
    }

    #[tokio::test]
    async fn empty_set_says_so() {
        let dir = tempfile::tempdir().unwrap();
        let mut review = review_with(&dir, &[]);
        review.activate(&FixedPhotoSource::new(Vec::new())).await;
        assert!(screen(&review).contains("No disabled photos"));
    }
}
