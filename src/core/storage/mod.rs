//! Filesystem-backed key-value slots.
//!
//! Each slot is one JSON file under the storage root. Slots are always read
//! and rewritten whole.

use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::config::Config;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Slot has never been written.
    #[error("slot not found: {0}")]
    NotFound(String),

    /// Slot exists but does not hold the expected JSON.
    #[error("slot {slot} is corrupt: {source}")]
    Corrupt {
        slot: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error on write.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage result type.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Storage backend for persisting slots.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Create a storage instance at the configured location.
    ///
    /// # Errors
    ///
    /// Returns error if data directory cannot be determined.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::with_root(config.store.resolve_dir()?))
    }

    /// Create a storage instance at a custom location.
    #[must_use]
    pub const fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the storage root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a slot.
    #[must_use]
    pub fn path(&self, slot: &str) -> PathBuf {
        self.root.join(slot).with_extension("json")
    }

    /// Read a slot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the slot was never written and
    /// [`StoreError::Corrupt`] if it cannot be parsed.
    pub fn read<T: DeserializeOwned>(&self, slot: &str) -> Result<T> {
        let path = self.path(slot);

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(slot.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
            slot: slot.to_string(),
            source,
        })
    }

    /// Replace the contents of a slot.
    ///
    /// The new value is written to a sibling temp file and renamed into
    /// place, so readers see either the old or the new value.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn write<T: Serialize>(&self, slot: &str, value: &T) -> Result<()> {
        let path = self.path(slot);
        std::fs::create_dir_all(&self.root)?;

        let json = serde_json::to_string(value)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Check if a slot exists.
    #[must_use]
    pub fn exists(&self, slot: &str) -> bool {
        self.path(slot).exists()
    }
}
