//! Two-state switch drawn inline in a list row.

use ratatui::{
    style::{Color, Style},
    text::Span,
};

/// Track color when the switch is on.
const TOGGLE_ON: Color = Color::Rgb(76, 209, 55);
/// Track color when the switch is off.
const TOGGLE_OFF: Color = Color::Rgb(220, 221, 225);

const KNOB: Color = Color::White;

/// A switch that shows whether a photo is enabled.
///
/// Purely visual: the row it sits in handles the key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    pub on: bool,
}

impl Toggle {
    #[must_use]
    pub const fn new(on: bool) -> Self {
        Self { on }
    }

    /// Knob and track as styled spans, knob on the right when on.
    #[must_use]
    pub fn spans(self) -> Vec<Span<'static>> {
        let track = Style::default().fg(if self.on { TOGGLE_ON } else { TOGGLE_OFF });
        let knob = Style::default().fg(KNOB).bg(if self.on { TOGGLE_ON } else { TOGGLE_OFF });
        if self.on {
            vec![Span::styled("━━", track), Span::styled("●", knob)]
        } else {
            vec![Span::styled("●", knob), Span::styled("━━", track)]
        }
    }
}
