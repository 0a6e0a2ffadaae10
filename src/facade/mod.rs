//! Thin service facade: CRUD passthrough plus the bulk-processing trigger.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::core::{Item, StoreResult};
use crate::processor::BatchProcessor;
use crate::storage::ItemStore;

/// Delegates CRUD to the store and bulk processing to the batch processor.
/// No business logic of its own.
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
    processor: BatchProcessor,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>, batch_workers: usize) -> Self {
        let processor = BatchProcessor::new(Arc::clone(&store), batch_workers);
        Self { store, processor }
    }

    pub async fn find_all(&self) -> StoreResult<Vec<Item>> {
        self.store.find_all().await
    }

    pub async fn find_by_id(&self, id: u64) -> StoreResult<Option<Item>> {
        self.store.find_by_id(id).await
    }

    pub async fn save(&self, item: Item) -> StoreResult<Item> {
        self.store.save(item).await
    }

    pub async fn delete_by_id(&self, id: u64) -> StoreResult<bool> {
        self.store.delete_by_id(id).await
    }

    /// Starts processing every stored item; returns the orchestration handle.
    pub fn process_items(&self) -> JoinHandle<Vec<Item>> {
        self.processor.process_all()
    }
}
