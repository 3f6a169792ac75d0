use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{KeyValueStore, StoreError};

// ============================================================================
// Generic Collection - a typed view over one slot
// ============================================================================
//
// Type Parameter:
// - `T`: the record type stored in the slot (serialized as a JSON array)
//
// Responsibilities:
// 1. Load the whole collection (malformed data reads as empty)
// 2. Save the whole collection back
//
// ============================================================================

pub struct Collection<T> {
    store: Arc<dyn KeyValueStore>,
    slot: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            slot: self.slot,
            _phantom: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> Collection<T> {
    pub fn new(store: Arc<dyn KeyValueStore>, slot: &'static str) -> Self {
        Self {
            store,
            slot,
            _phantom: PhantomData,
        }
    }

    pub fn slot(&self) -> &'static str {
        self.slot
    }

    /// Load every record in the slot
    ///
    /// Backend failures propagate. A slot that does not parse is logged and
    /// treated as an empty collection; the next `save` overwrites it.
    pub async fn load(&self) -> Result<Vec<T>, StoreError> {
        let Some(raw) = self.store.get(self.slot).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => {
                tracing::debug!(slot = self.slot, count = items.len(), "Loaded collection");
                Ok(items)
            }
            Err(e) => {
                tracing::warn!(
                    slot = self.slot,
                    error = %e,
                    "Malformed collection, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Replace the slot contents with `items`
    pub async fn save(&self, items: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_string(items).map_err(|source| StoreError::Serialization {
            slot: self.slot.to_string(),
            source,
        })?;

        self.store.set(self.slot, json).await?;

        tracing::debug!(slot = self.slot, count = items.len(), "Saved collection");
        Ok(())
    }
}
