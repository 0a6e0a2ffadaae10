use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ItemStore;
use crate::core::{Item, StoreResult};

/// In-memory keyed store with an atomic id sequence.
///
/// Records live under an `RwLock`ed map; id assignment never takes the map
/// lock, so concurrent inserts cannot observe duplicate ids.
pub struct InMemoryItemStore {
    items: RwLock<HashMap<u64, Item>>,
    next_id: AtomicU64,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn find_all_ids(&self) -> StoreResult<Vec<u64>> {
        Ok(self.items.read().await.keys().copied().collect())
    }

    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Item>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn save(&self, mut item: Item) -> StoreResult<Item> {
        let id = match item.id {
            Some(id) => {
                // Keep the sequence ahead of explicitly supplied ids.
                self.next_id.fetch_max(id + 1, Ordering::Relaxed);
                id
            }
            None => self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        item.id = Some(id);
        self.items.write().await.insert(id, item.clone());
        Ok(item)
    }

    async fn delete_by_id(&self, id: u64) -> StoreResult<bool> {
        Ok(self.items.write().await.remove(&id).is_some())
    }
}

impl Default for InMemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}
