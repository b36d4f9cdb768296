//! Error types for the core module.

use super::photo::KeyParseError;
use super::source::FetchError;
use super::storage::StoreError;

/// Core error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote photo source could not be read.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The disabled-set store could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A user-supplied photo key was malformed.
    #[error(transparent)]
    Key(#[from] KeyParseError),
}
