//! TUI application state.

use tokio::sync::mpsc;

use crate::core::{Deck, FetchError, PendingLoad, Photo, Route};

/// Message from a fetch task.
type LoadResult = (PendingLoad, Result<Vec<Photo>, FetchError>);

/// Application state for the TUI.
pub struct App {
    /// Views, navigation and the shared store.
    pub deck: Deck,

    /// One-line status shown in the footer (last action or error).
    pub status: Option<String>,

    /// Whether the event loop should exit.
    pub should_quit: bool,

    loads_tx: mpsc::UnboundedSender<LoadResult>,
    loads_rx: mpsc::UnboundedReceiver<LoadResult>,
}

impl App {
    #[must_use]
    pub fn new(deck: Deck) -> Self {
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();
        Self {
            deck,
            status: None,
            should_quit: false,
            loads_tx,
            loads_rx,
        }
    }

    /// Kick off the initial gallery load.
    pub fn start(&mut self) {
        let load = self.deck.start();
        self.spawn_load(load);
    }

    /// Run a load on a background task; the result comes back through
    /// [`App::drain_loads`].
    pub fn spawn_load(&self, load: PendingLoad) {
        let source = self.deck.source();
        let tx = self.loads_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch().await;
            // Receiver is gone once the TUI exits.
            let _ = tx.send((load, result));
        });
    }

    /// Apply finished loads. Returns `true` if anything was applied.
    pub fn drain_loads(&mut self) -> bool {
        let mut applied = false;
        while let Ok((load, result)) = self.loads_rx.try_recv() {
            applied |= self.deck.apply(load, result);
        }
        applied
    }

    /// Wait for the next finished load and apply it.
    pub async fn next_load(&mut self) -> bool {
        match self.loads_rx.recv().await {
            Some((load, result)) => self.deck.apply(load, result),
            None => false,
        }
    }

    /// Pick up store changes for the visible view.
    pub fn sync(&mut self) {
        match self.deck.route() {
            Route::Home { .. } => {
                self.deck.gallery_mut().sync_disabled();
            }
            Route::Disabled => {
                self.deck.review_mut().sync_disabled();
            }
        }
    }

    pub fn hide_selected(&mut self) {
        match self.deck.gallery_mut().hide_selected() {
            Ok(Some(key)) => self.status = Some(format!("Disabled {key}")),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to disable photo");
                self.status = Some(format!("Could not disable photo: {e}"));
            }
        }
    }

    pub fn open_disabled(&mut self) {
        let load = self.deck.open_disabled();
        self.spawn_load(load);
        self.status = None;
    }

    pub fn close_disabled(&mut self) {
        if let Some(load) = self.deck.close_disabled() {
            self.spawn_load(load);
        }
        self.status = None;
    }

    pub fn re_enable_selected(&mut self) {
        match self.deck.re_enable_selected() {
            Ok(Some((key, load))) => {
                if let Some(load) = load {
                    self.spawn_load(load);
                }
                self.status = Some(format!("Re-enabled {key}"));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to re-enable photo");
                self.status = Some(format!("Could not re-enable photo: {e}"));
            }
        }
    }

    pub fn reload(&mut self) {
        let load = self.deck.reload_current();
        self.spawn_load(load);
        self.status = None;
    }
}
