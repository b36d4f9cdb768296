//! Disabled review view: the photos the user has hidden.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use super::disabled::{DisabledSet, DisabledStore};
use super::navigation::Route;
use super::photo::{Photo, PhotoKey};
use super::source::{FetchError, PhotoSource};
use super::storage::StoreError;
use super::view::{Cursor, LoadState, LoadTicket, LoadTracker};

/// Source photos whose key is in `disabled`, in source order.
#[must_use]
pub fn disabled_photos<'a>(photos: &'a [Photo], disabled: &DisabledSet) -> Vec<&'a Photo> {
    photos
        .iter()
        .filter(|p| disabled.contains(&p.key()))
        .collect()
}

/// One row of the review list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ReviewEntry {
    /// Key of the hidden photo.
    #[schema(value_type = String)]
    pub key: PhotoKey,
    /// Photo details, absent when the source could not be reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
}

impl ReviewEntry {
    /// Album and photo id, from the photo or parsed from the key.
    #[must_use]
    pub fn ids(&self) -> Option<(u64, u64)> {
        self.photo
            .as_ref()
            .map(|p| (p.album_id, p.id))
            .or_else(|| self.key.parts())
    }
}

/// Build the review list.
///
/// With a fetched list, that is exactly the disabled photos. Without one
/// (the fetch failed), every disabled key is listed on its own so it can still
/// be re-enabled.
#[must_use]
pub fn review_entries(photos: Option<&[Photo]>, disabled: &DisabledSet) -> Vec<ReviewEntry> {
    match photos {
        Some(photos) => disabled_photos(photos, disabled)
            .into_iter()
            .map(|p| ReviewEntry {
                key: p.key(),
                photo: Some(p.clone()),
            })
            .collect(),
        None => placeholders(disabled.iter()),
    }
}

/// Key-only entries ordered by `(albumId, id)`; unparsable keys go last.
fn placeholders<'a>(keys: impl Iterator<Item = &'a PhotoKey>) -> Vec<ReviewEntry> {
    let mut keys: Vec<&PhotoKey> = keys.collect();
    keys.sort_by_key(|k| (k.parts().is_none(), k.parts(), k.as_str().to_string()));
    keys.into_iter()
        .map(|key| ReviewEntry {
            key: key.clone(),
            photo: None,
        })
        .collect()
}

/// State behind the disabled screen.
pub struct DisabledReview {
    store: Arc<DisabledStore>,
    changes: watch::Receiver<DisabledSet>,
    photos: Option<Vec<Photo>>,
    disabled: DisabledSet,
    loader: LoadTracker,
    cursor: Cursor,
}

impl DisabledReview {
    #[must_use]
    pub fn new(store: Arc<DisabledStore>) -> Self {
        let changes = store.subscribe();
        Self {
            store,
            changes,
            photos: None,
            disabled: DisabledSet::new(),
            loader: LoadTracker::default(),
            cursor: Cursor::default(),
        }
    }

    /// Start a load. Pass the ticket to [`DisabledReview::finish_load`].
    pub fn begin_load(&mut self) -> LoadTicket {
        self.cursor.reset();
        self.loader.begin()
    }

    /// Drop any load in flight, e.g. when leaving the screen.
    pub const fn cancel_load(&mut self) {
        self.loader.cancel();
    }

    /// Load the disabled snapshot and apply a fetch result.
    ///
    /// Returns `false` and changes nothing if `ticket` is stale.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Photo>, FetchError>,
    ) -> bool {
        if !self.loader.is_current(ticket) {
            tracing::debug!("dropping stale review load");
            return false;
        }

        self.disabled = self.store.load();
        self.changes.mark_unchanged();

        match result {
            Ok(photos) => {
                self.photos = Some(photos);
                self.loader.set_state(LoadState::Ready);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch photos for review");
                self.loader.set_state(LoadState::Failed(e.to_string()));
            }
        }

        self.cursor.clamp(self.entries().len());
        true
    }

    /// Fetch and load in one step.
    pub async fn activate(&mut self, source: &dyn PhotoSource) {
        let ticket = self.begin_load();
        let result = source.fetch().await;
        self.finish_load(ticket, result);
    }

    /// Adopt the store's latest committed set if it changed.
    pub fn sync_disabled(&mut self) -> bool {
        if !self.changes.has_changed().unwrap_or(false) {
            return false;
        }
        self.disabled = self.changes.borrow_and_update().clone();
        self.cursor.clamp(self.entries().len());
        true
    }

    /// Re-enable a photo and reload this list from the store.
    ///
    /// Returns the route the shell should reset to so the gallery reloads.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not persist the change.
    pub fn re_enable(&mut self, key: &PhotoKey) -> Result<Route, StoreError> {
        self.store.remove(key)?;
        self.disabled = self.store.load();
        self.changes.mark_unchanged();
        self.cursor.clamp(self.entries().len());
        Ok(Route::Home { is_load: Some(true) })
    }

    /// Re-enable the entry under the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not persist the change.
    pub fn re_enable_selected(&mut self) -> Result<Option<(PhotoKey, Route)>, StoreError> {
        let Some(key) = self.selected().map(|e| e.key.clone()) else {
            return Ok(None);
        };
        let route = self.re_enable(&key)?;
        Ok(Some((key, route)))
    }

    #[must_use]
    pub fn entries(&self) -> Vec<ReviewEntry> {
        if self.loader.state().is_loading() && self.photos.is_none() {
            return Vec::new();
        }
        let mut entries = review_entries(self.photos.as_deref(), &self.disabled);
        // The last good list may predate keys hidden since; keep those reachable.
        if self.loader.state().failure().is_some() && self.photos.is_some() {
            entries.extend(placeholders(self.unmatched_keys().into_iter()));
        }
        entries
    }

    /// Disabled keys with no matching photo in a successful fetch.
    ///
    /// Zero while failed, since those keys are listed as placeholders then.
    #[must_use]
    pub fn unmatched(&self) -> usize {
        if self.loader.state().failure().is_some() {
            return 0;
        }
        self.unmatched_keys().len()
    }

    fn unmatched_keys(&self) -> Vec<&PhotoKey> {
        let Some(photos) = &self.photos else {
            return Vec::new();
        };
        let known: HashSet<PhotoKey> = photos.iter().map(Photo::key).collect();
        self.disabled.iter().filter(|k| !known.contains(*k)).collect()
    }

    #[must_use]
    pub fn selected(&self) -> Option<ReviewEntry> {
        self.entries().into_iter().nth(self.cursor.index())
    }

    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn select_next(&mut self) {
        let len = self.entries().len();
        self.cursor.next(len);
    }

    pub const fn select_previous(&mut self) {
        self.cursor.previous();
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        self.loader.state()
    }

    #[must_use]
    pub const fn disabled(&self) -> &DisabledSet {
        &self.disabled
    }
}
