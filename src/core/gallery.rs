//! Gallery view: every fetched photo that is neither hidden nor filtered out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::disabled::{DisabledSet, DisabledStore};
use super::photo::{Photo, PhotoKey};
use super::source::{FetchError, PhotoSource};
use super::storage::StoreError;
use super::view::{Cursor, LoadState, LoadTicket, LoadTracker};

/// Photos that are not disabled and whose title contains `search`
/// (case-insensitive), in source order.
#[must_use]
pub fn visible_photos<'a>(
    photos: &'a [Photo],
    disabled: &DisabledSet,
    search: &str,
) -> Vec<&'a Photo> {
    photos
        .iter()
        .filter(|p| !disabled.contains(&p.key()))
        .filter(|p| p.title_matches(search))
        .collect()
}

/// State behind the home screen.
pub struct Gallery {
    store: Arc<DisabledStore>,
    changes: watch::Receiver<DisabledSet>,
    photos: Vec<Photo>,
    disabled: DisabledSet,
    search: String,
    loader: LoadTracker,
    cursor: Cursor,
    fetched_at: Option<DateTime<Utc>>,
}

impl Gallery {
    #[must_use]
    pub fn new(store: Arc<DisabledStore>) -> Self {
        let changes = store.subscribe();
        Self {
            store,
            changes,
            photos: Vec::new(),
            disabled: DisabledSet::new(),
            search: String::new(),
            loader: LoadTracker::default(),
            cursor: Cursor::default(),
            fetched_at: None,
        }
    }

    /// Start a full reload. Pass the ticket to [`Gallery::finish_load`].
    pub fn begin_load(&mut self) -> LoadTicket {
        self.loader.begin()
    }

    /// Apply a fetch result, then reload the disabled snapshot.
    ///
    /// Returns `false` and changes nothing if `ticket` is stale.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Photo>, FetchError>,
    ) -> bool {
        if !self.loader.is_current(ticket) {
            tracing::debug!("dropping stale gallery load");
            return false;
        }

        match result {
            Ok(photos) => {
                self.photos = photos;
                self.fetched_at = Some(Utc::now());
                self.loader.set_state(LoadState::Ready);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch photos");
                self.loader.set_state(LoadState::Failed(e.to_string()));
            }
        }

        self.disabled = self.store.load();
        self.changes.mark_unchanged();
        self.cursor.clamp(self.visible().len());
        true
    }

    /// Fetch and load in one step.
    pub async fn activate(&mut self, source: &dyn PhotoSource) {
        let ticket = self.begin_load();
        let result = source.fetch().await;
        self.finish_load(ticket, result);
    }

    /// Called when the view is shown again.
    ///
    /// Picks up store changes made elsewhere. When `reload` is set, starts a
    /// full reload and returns its ticket; otherwise the fetched list is
    /// reused as is.
    pub fn show(&mut self, reload: bool) -> Option<LoadTicket> {
        self.sync_disabled();
        reload.then(|| self.begin_load())
    }

    /// Adopt the store's latest committed set if it changed.
    pub fn sync_disabled(&mut self) -> bool {
        if !self.changes.has_changed().unwrap_or(false) {
            return false;
        }
        self.disabled = self.changes.borrow_and_update().clone();
        self.cursor.clamp(self.visible().len());
        true
    }

    /// Hide a photo.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not persist the change; the photo
    /// stays visible in that case.
    pub fn hide(&mut self, key: PhotoKey) -> Result<(), StoreError> {
        self.disabled = self.store.add(key)?;
        self.changes.mark_unchanged();
        self.cursor.clamp(self.visible().len());
        Ok(())
    }

    /// Hide the photo under the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not persist the change.
    pub fn hide_selected(&mut self) -> Result<Option<PhotoKey>, StoreError> {
        let Some(key) = self.selected().map(Photo::key) else {
            return Ok(None);
        };
        self.hide(key.clone())?;
        Ok(Some(key))
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&Photo> {
        visible_photos(&self.photos, &self.disabled, &self.search)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Photo> {
        self.visible().get(self.cursor.index()).copied()
    }

    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        self.cursor.next(len);
    }

    pub const fn select_previous(&mut self) {
        self.cursor.previous();
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.cursor.reset();
    }

    pub fn search_push(&mut self, c: char) {
        self.search.push(c);
        self.cursor.reset();
    }

    pub fn search_pop(&mut self) {
        self.search.pop();
        self.cursor.reset();
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        self.loader.state()
    }

    /// Everything fetched, hidden or not.
    #[must_use]
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// The disabled snapshot this view filters against.
    #[must_use]
    pub const fn disabled(&self) -> &DisabledSet {
        &self.disabled
    }

    #[must_use]
    pub const fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}
