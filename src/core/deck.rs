//! Composition root: one store, one source, two views and the navigator.

use std::sync::Arc;

use super::disabled::DisabledStore;
use super::gallery::Gallery;
use super::navigation::{Navigator, Route};
use super::photo::{Photo, PhotoKey};
use super::review::DisabledReview;
use super::source::{FetchError, PhotoSource};
use super::storage::StoreError;
use super::view::LoadTicket;

/// Which view a load belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewId {
    Gallery,
    Review,
}

/// A load a caller must run against the source and hand back to
/// [`Deck::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLoad {
    pub view: ViewId,
    pub ticket: LoadTicket,
}

/// The gallery and review views wired to a shared store.
pub struct Deck {
    source: Arc<dyn PhotoSource>,
    store: Arc<DisabledStore>,
    navigator: Navigator,
    gallery: Gallery,
    review: DisabledReview,
}

impl Deck {
    #[must_use]
    pub fn new(source: Arc<dyn PhotoSource>, store: Arc<DisabledStore>) -> Self {
        Self {
            gallery: Gallery::new(Arc::clone(&store)),
            review: DisabledReview::new(Arc::clone(&store)),
            navigator: Navigator::new(),
            source,
            store,
        }
    }

    /// Initial gallery load.
    pub fn start(&mut self) -> PendingLoad {
        PendingLoad {
            view: ViewId::Gallery,
            ticket: self.gallery.begin_load(),
        }
    }

    /// Go to the review screen and start loading it.
    pub fn open_disabled(&mut self) -> PendingLoad {
        self.navigator.navigate(Route::Disabled);
        PendingLoad {
            view: ViewId::Review,
            ticket: self.review.begin_load(),
        }
    }

    /// Leave the review screen without a reload signal.
    pub fn close_disabled(&mut self) -> Option<PendingLoad> {
        if self.navigator.current() != &Route::Disabled {
            return None;
        }
        self.review.cancel_load();
        self.navigator.back();
        self.enter_home()
    }

    /// Re-enable a photo from the review screen.
    ///
    /// Navigation resets to a single home route carrying the reload signal,
    /// and the gallery reload that signal triggers is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not persist the change; navigation
    /// is left as it was.
    pub fn re_enable(&mut self, key: &PhotoKey) -> Result<Option<PendingLoad>, StoreError> {
        let route = self.review.re_enable(key)?;
        self.review.cancel_load();
        self.navigator.reset(route);
        Ok(self.enter_home())
    }

    /// Re-enable the review entry under the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not persist the change.
    pub fn re_enable_selected(
        &mut self,
    ) -> Result<Option<(PhotoKey, Option<PendingLoad>)>, StoreError> {
        let Some(key) = self.review.selected().map(|e| e.key) else {
            return Ok(None);
        };
        let load = self.re_enable(&key)?;
        Ok(Some((key, load)))
    }

    /// Reload whichever view is showing.
    pub fn reload_current(&mut self) -> PendingLoad {
        match self.navigator.current() {
            Route::Home { .. } => PendingLoad {
                view: ViewId::Gallery,
                ticket: self.gallery.begin_load(),
            },
            Route::Disabled => PendingLoad {
                view: ViewId::Review,
                ticket: self.review.begin_load(),
            },
        }
    }

    /// Hand a fetch result to the view that asked for it.
    ///
    /// Returns `false` if the load was superseded.
    pub fn apply(&mut self, load: PendingLoad, result: Result<Vec<Photo>, FetchError>) -> bool {
        match load.view {
            ViewId::Gallery => self.gallery.finish_load(load.ticket, result),
            ViewId::Review => self.review.finish_load(load.ticket, result),
        }
    }

    /// Fetch and apply in place.
    pub async fn run(&mut self, load: PendingLoad) -> bool {
        let result = self.source.fetch().await;
        self.apply(load, result)
    }

    fn enter_home(&mut self) -> Option<PendingLoad> {
        let reload = self.navigator.take_reload();
        self.gallery.show(reload).map(|ticket| PendingLoad {
            view: ViewId::Gallery,
            ticket,
        })
    }

    #[must_use]
    pub fn source(&self) -> Arc<dyn PhotoSource> {
        Arc::clone(&self.source)
    }

    #[must_use]
    pub const fn store(&self) -> &Arc<DisabledStore> {
        &self.store
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        self.navigator.current()
    }

    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub const fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub const fn gallery_mut(&mut self) -> &mut Gallery {
        &mut self.gallery
    }

    #[must_use]
    pub const fn review(&self) -> &DisabledReview {
        &self.review
    }

    pub const fn review_mut(&mut self) -> &mut DisabledReview {
        &mut self.review
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::photo::photo;
    use crate::core::source::FixedPhotoSource;
    use crate::core::storage::Storage;

    fn deck(source: Arc<FixedPhotoSource>) -> (Deck, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DisabledStore::open(Storage::with_root(dir.path().to_path_buf())));
        (Deck::new(source, store), dir)
    }

    #[tokio::test]
    async fn back_without_signal_does_not_refetch() {
        let source = Arc::new(FixedPhotoSource::new(vec![photo(1, 1, "A")]));
        let (mut deck, _dir) = deck(Arc::clone(&source));

        let load = deck.start();
        deck.run(load).await;
        let load = deck.open_disabled();
        deck.run(load).await;
        assert_eq!(source.fetch_count(), 2);

        assert!(deck.close_disabled().is_none());
        assert_eq!(deck.route(), &Route::home());
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn late_review_result_after_leaving_is_dropped() {
        let source = Arc::new(FixedPhotoSource::new(vec![photo(1, 1, "A")]));
        let (mut deck, _dir) = deck(source);

        let load = deck.start();
        deck.run(load).await;
        let review_load = deck.open_disabled();
        deck.close_disabled();

        assert!(!deck.apply(review_load, Ok(vec![photo(1, 1, "A")])));
    }

    #[tokio::test]
    async fn reload_targets_current_view() {
        let source = Arc::new(FixedPhotoSource::new(Vec::new()));
        let (mut deck, _dir) = deck(source);

        assert_eq!(deck.reload_current().view, ViewId::Gallery);
        deck.open_disabled();
        assert_eq!(deck.reload_current().view, ViewId::Review);
    }

    #[test]
    fn close_disabled_from_home_is_a_no_op() {
        let source = Arc::new(FixedPhotoSource::new(Vec::new()));
        let (mut deck, _dir) = deck(source);
        assert!(deck.close_disabled().is_none());
        assert_eq!(deck.navigator().depth(), 1);
    }
}
