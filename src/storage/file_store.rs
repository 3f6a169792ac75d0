use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{KeyValueStore, StoreError};

// ============================================================================
// File Store - one JSON file per slot
// ============================================================================
//
// Layout: `<root>/<slot>.json`. Writes go to `<slot>.json.tmp` first and are
// renamed into place, so a crash mid-write never leaves a truncated slot.
// Two processes writing the same root still race (last rename wins).
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::io("<root>", e))?;

        tracing::debug!(root = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.root.join(format!("{slot}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, slot: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.slot_path(slot)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(slot, e)),
        }
    }

    async fn set(&self, slot: &str, value: String) -> Result<(), StoreError> {
        let path = self.slot_path(slot);
        let tmp = self.root.join(format!("{slot}.json.tmp"));

        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| StoreError::io(slot, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::io(slot, e))?;

        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.slot_path(slot)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(slot, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        assert!(store.get("fuelOrders").await.unwrap().is_none());

        store.set("fuelOrders", "[]".to_string()).await.unwrap();
        assert_eq!(store.get("fuelOrders").await.unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("fuelOrders.json").exists());
        assert!(!dir.path().join("fuelOrders.json.tmp").exists());

        // A second handle on the same root sees the same data
        let reopened = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.get("fuelOrders").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_remove_missing_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested")).await.unwrap();

        store.remove("currentUser").await.unwrap();
        assert!(store.root().ends_with("nested"));
    }

    #[tokio::test]
    async fn test_unreadable_slot_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("users.json")).unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        let err = store.get("users").await.unwrap_err();
        assert!(matches!(err, StoreError::Io { ref slot, .. } if slot == "users"));
    }
}
