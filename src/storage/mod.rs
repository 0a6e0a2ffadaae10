pub mod memory;

pub use memory::InMemoryItemStore;

use async_trait::async_trait;

use crate::core::{Item, StoreResult};

/// Keyed persistence contract consumed by the facade and the batch processor.
///
/// Implementations must be safe for concurrent access by multiple
/// simultaneous callers.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn find_all(&self) -> StoreResult<Vec<Item>>;

    /// Snapshot of all current keys. Does not block on any individual record.
    async fn find_all_ids(&self) -> StoreResult<Vec<u64>>;

    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Item>>;

    /// Insert when the id is unset (the store assigns one), update otherwise.
    /// Returns the persisted form.
    async fn save(&self, item: Item) -> StoreResult<Item>;

    /// Returns whether a record with that id existed and was removed.
    async fn delete_by_id(&self, id: u64) -> StoreResult<bool>;
}
