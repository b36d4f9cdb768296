//! Load state shared by the gallery and review views.

/// Lifecycle of a view's data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// A fetch is in flight.
    #[default]
    Loading,
    /// Data is loaded.
    Ready,
    /// The last fetch failed. Whatever was loaded before is kept.
    Failed(String),
}

impl LoadState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Failure reason, if the last fetch failed.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Identifies one load started by a view.
///
/// Only the most recent ticket is accepted when the result comes back, so a
/// fetch that finishes after the view was reloaded or left is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Issues tickets and tracks load state for one view.
#[derive(Debug, Default)]
pub struct LoadTracker {
    generation: u64,
    state: LoadState,
}

impl LoadTracker {
    /// Start a new load, invalidating any outstanding ticket.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket(self.generation)
    }

    /// Invalidate outstanding tickets without starting a new load.
    pub const fn cancel(&mut self) {
        self.generation += 1;
    }

    /// Whether `ticket` belongs to the load currently in flight.
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation && self.state.is_loading()
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn set_state(&mut self, state: LoadState) {
        self.state = state;
    }
}

/// Cursor over a list whose length changes underneath it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
}

impl Cursor {
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    pub const fn next(&mut self, len: usize) {
        if len > 0 && self.index + 1 < len {
            self.index += 1;
        }
    }

    pub const fn previous(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub const fn reset(&mut self) {
        self.index = 0;
    }

    /// Keep the cursor on the last item when the list shrinks.
    pub const fn clamp(&mut self, len: usize) {
        if self.index >= len {
            self.index = len.saturating_sub(1);
        }
    }
}
