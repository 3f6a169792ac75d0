use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, StoreError};

/// Process-local store, used by tests and when no data directory is configured
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, slot: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.read().await.get(slot).cloned())
    }

    async fn set(&self, slot: &str, value: String) -> Result<(), StoreError> {
        self.slots.write().await.insert(slot.to_string(), value);
        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<(), StoreError> {
        self.slots.write().await.remove(slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_slot_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("users").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        store.set("currentUser", "{}".to_string()).await.unwrap();
        assert_eq!(store.get("currentUser").await.unwrap().as_deref(), Some("{}"));

        store.remove("currentUser").await.unwrap();
        assert!(store.get("currentUser").await.unwrap().is_none());

        // Removing twice is fine
        store.remove("currentUser").await.unwrap();
    }
}
