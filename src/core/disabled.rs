//! The set of photos the user has hidden.
//!
//! One [`DisabledStore`] is owned by the composition root and shared by every
//! view. Mutations are serialized by an in-process lock and each one rewrites
//! the whole slot before publishing the new set to subscribers, so the value
//! seen through [`DisabledStore::subscribe`] always matches what is on disk.
//!
//! Separate processes pointing at the same storage directory are not
//! coordinated: each mutation re-reads the slot, but two processes writing at
//! the same moment race and the last writer wins.

use std::collections::BTreeSet;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::photo::PhotoKey;
use super::storage::{Storage, StoreError};

/// Slot holding the disabled keys.
pub const DISABLED_SLOT: &str = "disabledPhotos";

/// A set of hidden photo keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisabledSet(BTreeSet<PhotoKey>);

impl DisabledSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &PhotoKey) -> bool {
        self.0.contains(key)
    }

    /// Insert a key. Returns `false` if it was already present.
    pub fn insert(&mut self, key: PhotoKey) -> bool {
        self.0.insert(key)
    }

    /// Remove a key. Returns `false` if it was absent.
    pub fn remove(&mut self, key: &PhotoKey) -> bool {
        self.0.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &PhotoKey> {
        self.0.iter()
    }
}

impl FromIterator<PhotoKey> for DisabledSet {
    fn from_iter<I: IntoIterator<Item = PhotoKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Durable, observable store of hidden photo keys.
pub struct DisabledStore {
    storage: Storage,
    write_lock: Mutex<()>,
    tx: watch::Sender<DisabledSet>,
}

impl DisabledStore {
    /// Open the store, reading the current slot contents.
    #[must_use]
    pub fn open(storage: Storage) -> Self {
        let initial = read_or_empty(&storage);
        let (tx, _rx) = watch::channel(initial);
        Self {
            storage,
            write_lock: Mutex::new(()),
            tx,
        }
    }

    /// Read the persisted set.
    ///
    /// A missing slot, an unreadable slot and a corrupt slot all yield an
    /// empty set. Use [`DisabledStore::try_load`] to tell them apart.
    #[must_use]
    pub fn load(&self) -> DisabledSet {
        let set = read_or_empty(&self.storage);
        self.publish(&set);
        set
    }

    /// Read the persisted set, reporting unreadable or corrupt slots.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] or [`StoreError::Io`]. A slot that was
    /// never written is an empty set, not an error.
    pub fn try_load(&self) -> Result<DisabledSet, StoreError> {
        let set = match self.storage.read::<DisabledSet>(DISABLED_SLOT) {
            Ok(set) => set,
            Err(StoreError::NotFound(_)) => DisabledSet::new(),
            Err(e) => return Err(e),
        };
        self.publish(&set);
        Ok(set)
    }

    /// Hide a photo. Adding a key that is already present changes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read or rewritten. On error the
    /// published set is left untouched.
    pub fn add(&self, key: PhotoKey) -> Result<DisabledSet, StoreError> {
        tracing::info!(key = %key, "disabling photo");
        self.mutate(|set| set.insert(key))
    }

    /// Re-enable a photo. Removing an absent key changes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read or rewritten. On error the
    /// published set is left untouched.
    pub fn remove(&self, key: &PhotoKey) -> Result<DisabledSet, StoreError> {
        tracing::info!(key = %key, "re-enabling photo");
        self.mutate(|set| set.remove(key))
    }

    /// Latest committed set, without touching storage.
    #[must_use]
    pub fn snapshot(&self) -> DisabledSet {
        self.tx.borrow().clone()
    }

    /// Subscribe to committed changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DisabledSet> {
        self.tx.subscribe()
    }

    /// Storage backing this store.
    #[must_use]
    pub const fn storage(&self) -> &Storage {
        &self.storage
    }

    fn mutate<F>(&self, f: F) -> Result<DisabledSet, StoreError>
    where
        F: FnOnce(&mut DisabledSet) -> bool,
    {
        let _guard = self.write_lock.lock();

        let mut set = match self.storage.read::<DisabledSet>(DISABLED_SLOT) {
            Ok(set) => set,
            Err(StoreError::NotFound(_)) => DisabledSet::new(),
            Err(StoreError::Corrupt { source, .. }) => {
                tracing::warn!(error = %source, "overwriting corrupt disabled set");
                DisabledSet::new()
            }
            Err(e) => return Err(e),
        };

        if f(&mut set) {
            self.storage.write(DISABLED_SLOT, &set)?;
        }

        self.publish(&set);
        Ok(set)
    }

    fn publish(&self, set: &DisabledSet) {
        self.tx.send_if_modified(|current| {
            if current == set {
                false
            } else {
                current.clone_from(set);
                true
            }
        });
    }
}

fn read_or_empty(storage: &Storage) -> DisabledSet {
    match storage.read::<DisabledSet>(DISABLED_SLOT) {
        Ok(set) => set,
        Err(StoreError::NotFound(_)) => DisabledSet::new(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load disabled set, treating as empty");
            DisabledSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (DisabledStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = DisabledStore::open(Storage::with_root(dir.path().to_path_buf()));
        (store, dir)
    }

    fn key(album: u64, id: u64) -> PhotoKey {
        PhotoKey::new(album, id)
    }

    #[test]
    fn empty_when_never_written() {
        let (store, _dir) = temp_store();
        assert!(store.load().is_empty());
        assert!(store.try_load().unwrap().is_empty());
        assert!(!store.storage().exists(DISABLED_SLOT));
    }

    #[test]
    fn add_persists_whole_set() {
        let (store, _dir) = temp_store();
        store.add(key(1, 1)).unwrap();
        let set = store.add(key(1, 2)).unwrap();
        assert_eq!(set.len(), 2);

        let on_disk: Vec<String> = store.storage().read(DISABLED_SLOT).unwrap();
        assert_eq!(on_disk, vec!["1-1".to_string(), "1-2".to_string()]);
    }

    #[test]
    fn add_is_idempotent() {
        let (store, _dir) = temp_store();
        let once = store.add(key(1, 1)).unwrap();
        let twice = store.add(key(1, 1)).unwrap();
        assert_eq!(once, twice);
        assert_eq!(store.load(), once);
    }

    #[test]
    fn remove_is_idempotent() {
        let (store, _dir) = temp_store();
        store.add(key(1, 1)).unwrap();
        store.add(key(2, 5)).unwrap();

        let once = store.remove(&key(1, 1)).unwrap();
        let twice = store.remove(&key(1, 1)).unwrap();
        assert_eq!(once, twice);
        assert!(!once.contains(&key(1, 1)));
        assert!(once.contains(&key(2, 5)));
    }

    #[test]
    fn remove_absent_key_from_empty_store_writes_nothing() {
        let (store, _dir) = temp_store();
        let set = store.remove(&key(9, 9)).unwrap();
        assert!(set.is_empty());
        assert!(!store.storage().exists(DISABLED_SLOT));
    }

    #[test]
    fn duplicates_on_disk_collapse() {
        let (store, _dir) = temp_store();
        store
            .storage()
            .write(DISABLED_SLOT, &["1-1", "1-1", "2-2"])
            .unwrap();
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn corrupt_slot_loads_empty_but_try_load_reports_it() {
        let (store, dir) = temp_store();
        std::fs::write(dir.path().join("disabledPhotos.json"), "[1, 2").unwrap();

        assert!(store.load().is_empty());
        assert!(matches!(store.try_load(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn mutation_recovers_corrupt_slot() {
        let (store, dir) = temp_store();
        std::fs::write(dir.path().join("disabledPhotos.json"), "nope").unwrap();

        let set = store.add(key(4, 2)).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(store.try_load().unwrap(), set);
    }

    #[test]
    fn subscribers_see_committed_sets() {
        let (store, _dir) = temp_store();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.add(key(1, 1)).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().contains(&key(1, 1)));

        // No-op mutation does not notify.
        store.add(key(1, 1)).unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn failed_write_leaves_snapshot_untouched() {
        let dir = tempfile::tempdir().unwrap();
        // Storage root is a file, so create_dir_all fails.
        let root = dir.path().join("blocked");
        std::fs::write(&root, "").unwrap();
        let store = DisabledStore::open(Storage::with_root(root));

        assert!(store.add(key(1, 1)).is_err());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let (store, _dir) = temp_store();

        std::thread::scope(|s| {
            for album in 0..8 {
                let store = &store;
                s.spawn(move || {
                    for id in 0..10 {
                        store.add(key(album, id)).unwrap();
                    }
                });
            }
        });

        assert_eq!(store.load().len(), 80);
        assert_eq!(store.snapshot().len(), 80);
    }
}
