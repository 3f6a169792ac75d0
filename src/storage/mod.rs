// ============================================================================
// Storage - Key-Value Slot Persistence
// ============================================================================
//
// Every persisted collection lives in one named slot and is read and
// written wholesale. Backends implement `KeyValueStore`; services only
// ever see `Collection<T>` or the raw trait.
//
// ============================================================================

mod collection;
mod errors;
mod file_store;
mod memory_store;

pub use collection::Collection;
pub use errors::StoreError;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;

use async_trait::async_trait;

/// Well-known slot names
pub mod slots {
    pub const USERS: &str = "users";
    pub const CURRENT_USER: &str = "currentUser";
    pub const FUEL_ORDERS: &str = "fuelOrders";
}

/// Get/set/remove over named slots holding serialized values
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the slot has never been written (or was removed)
    async fn get(&self, slot: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, slot: &str, value: String) -> Result<(), StoreError>;

    /// Removing a missing slot is not an error
    async fn remove(&self, slot: &str) -> Result<(), StoreError>;
}
