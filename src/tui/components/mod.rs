//! TUI components for rendering the two screens.

mod disabled;
mod footer;
mod gallery;
mod toggle;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub use disabled::render_disabled;
pub use footer::render_footer;
pub use gallery::render_gallery;
pub use toggle::Toggle;

/// Brand colors.
const ACCENT: Color = Color::Rgb(78, 125, 255);
const DANGER: Color = Color::Rgb(192, 57, 43);
const DIMMED: Color = Color::Rgb(100, 100, 110);
const SELECTED_BG: Color = Color::Rgb(45, 48, 55);

/// Centered single-line notice, used for loading and empty lists.
fn notice(text: impl Into<String>, area: Rect) -> (Paragraph<'static>, Rect) {
    let line = Line::from(Span::styled(text.into(), Style::default().fg(DIMMED)));
    let y = area.y + area.height / 2;
    (
        Paragraph::new(line).alignment(Alignment::Center),
        Rect::new(area.x, y, area.width, 1.min(area.height)),
    )
}

/// "ID: 2  Album ID: 1", or the raw key when it cannot be split.
fn id_label(ids: Option<(u64, u64)>, fallback: &str) -> String {
    ids.map_or_else(
        || fallback.to_string(),
        |(album_id, id)| format!("ID: {id}  Album ID: {album_id}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_label_prefers_ids() {
        assert_eq!(id_label(Some((1, 2)), "1-2"), "ID: 2  Album ID: 1");
        assert_eq!(id_label(None, "weird"), "weird");
    }

    #[test]
    fn notice_is_vertically_centered() {
        let (_, rect) = notice("Loading", Rect::new(0, 0, 20, 10));
        assert_eq!(rect.y, 5);
        assert_eq!(rect.height, 1);
    }
}
