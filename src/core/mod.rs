//! Core logic shared across CLI, TUI, and API.

pub mod deck;
pub mod disabled;
mod error;
pub mod gallery;
pub mod navigation;
pub mod photo;
pub mod review;
pub mod source;
pub mod storage;
pub mod view;

use std::sync::Arc;

pub use deck::{Deck, PendingLoad, ViewId};
pub use disabled::{DISABLED_SLOT, DisabledSet, DisabledStore};
pub use error::Error;
pub use gallery::{Gallery, visible_photos};
pub use navigation::{Navigator, Route};
pub use photo::{KeyParseError, Photo, PhotoKey};
pub use review::{DisabledReview, ReviewEntry, disabled_photos, review_entries};
pub use source::{FetchError, FixedPhotoSource, HttpPhotoSource, PhotoSource};
pub use storage::{Storage, StoreError};
pub use view::{LoadState, LoadTicket};

use crate::config::Config;

/// Build the shared source and store from configuration.
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined or the HTTP
/// client cannot be built.
pub fn open(config: &Config) -> anyhow::Result<(Arc<dyn PhotoSource>, Arc<DisabledStore>)> {
    let storage = Storage::from_config(config)?;
    tracing::info!(root = %storage.root().display(), "opening disabled store");

    let store = Arc::new(DisabledStore::open(storage));
    let source: Arc<dyn PhotoSource> = Arc::new(HttpPhotoSource::new(&config.source)?);
    Ok((source, store))
}
