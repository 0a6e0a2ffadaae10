/// Batch processor tests
///
/// Cover the concurrency contract: thread-safe aggregation, the
/// all-complete-before-resolve barrier, bounded concurrency and per-unit
/// failure isolation.
/// Run with: cargo test --test batch_processor_tests
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use itemflow::{
    BatchProcessor, InMemoryItemStore, Item, ItemStatus, ItemStore, StoreError, StoreResult,
};

fn unprocessed_item(name: &str) -> Item {
    Item {
        id: None,
        name: name.to_string(),
        description: Some("description".to_string()),
        status: ItemStatus::Unprocessed,
        email: Some("valid@mail.com".to_string()),
    }
}

async fn seed(store: &InMemoryItemStore, count: usize) -> Vec<u64> {
    let mut ids = Vec::with_capacity(count);
    for index in 0..count {
        let saved = store
            .save(unprocessed_item(&format!("item_{index}")))
            .await
            .unwrap();
        ids.push(saved.id.unwrap());
    }
    ids
}

/// Reports extra ids from `find_all_ids` that no record backs, simulating
/// records deleted between the id snapshot and their unit running.
struct GhostIdsStore {
    inner: InMemoryItemStore,
    ghosts: Vec<u64>,
}

#[async_trait]
impl ItemStore for GhostIdsStore {
    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        self.inner.find_all().await
    }

    async fn find_all_ids(&self) -> StoreResult<Vec<u64>> {
        let mut ids = self.inner.find_all_ids().await?;
        ids.extend(&self.ghosts);
        Ok(ids)
    }

    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Item>> {
        self.inner.find_by_id(id).await
    }

    async fn save(&self, item: Item) -> StoreResult<Item> {
        self.inner.save(item).await
    }

    async fn delete_by_id(&self, id: u64) -> StoreResult<bool> {
        self.inner.delete_by_id(id).await
    }
}

/// Fails `save` for a chosen set of ids.
struct FailingSaveStore {
    inner: InMemoryItemStore,
    fail_ids: HashSet<u64>,
}

#[async_trait]
impl ItemStore for FailingSaveStore {
    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        self.inner.find_all().await
    }

    async fn find_all_ids(&self) -> StoreResult<Vec<u64>> {
        self.inner.find_all_ids().await
    }

    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Item>> {
        self.inner.find_by_id(id).await
    }

    async fn save(&self, item: Item) -> StoreResult<Item> {
        if let Some(id) = item.id
            && self.fail_ids.contains(&id)
        {
            return Err(StoreError::Unavailable(format!(
                "injected save failure for item {id}"
            )));
        }
        self.inner.save(item).await
    }

    async fn delete_by_id(&self, id: u64) -> StoreResult<bool> {
        self.inner.delete_by_id(id).await
    }
}

/// Slows every save down and instruments completion and concurrency, so a
/// broken resolve barrier or an unbounded pool is observable.
struct SlowCountingStore {
    inner: InMemoryItemStore,
    completed_saves: AtomicU64,
    inflight: AtomicU64,
    max_inflight: AtomicU64,
}

impl SlowCountingStore {
    fn new(inner: InMemoryItemStore) -> Self {
        Self {
            inner,
            completed_saves: AtomicU64::new(0),
            inflight: AtomicU64::new(0),
            max_inflight: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl ItemStore for SlowCountingStore {
    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        self.inner.find_all().await
    }

    async fn find_all_ids(&self) -> StoreResult<Vec<u64>> {
        self.inner.find_all_ids().await
    }

    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Item>> {
        self.inner.find_by_id(id).await
    }

    async fn save(&self, item: Item) -> StoreResult<Item> {
        let now = self.inflight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_inflight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(5)).await;
        let saved = self.inner.save(item).await;

        self.inflight.fetch_sub(1, Ordering::SeqCst);
        self.completed_saves.fetch_add(1, Ordering::SeqCst);
        saved
    }

    async fn delete_by_id(&self, id: u64) -> StoreResult<bool> {
        self.inner.delete_by_id(id).await
    }
}

#[tokio::test]
async fn processes_every_stored_item() {
    let store = Arc::new(InMemoryItemStore::new());
    seed(&store, 25).await;

    let report = BatchProcessor::new(store.clone(), 4).run().await;

    assert_eq!(report.items.len(), 25);
    assert_eq!(report.succeeded, 25);
    assert_eq!(report.failed, 0);
    assert!(
        report
            .items
            .iter()
            .all(|item| item.status == ItemStatus::Processed)
    );

    // The durable copies were updated too.
    let stored = store.find_all().await.unwrap();
    assert!(stored.iter().all(|item| item.status == ItemStatus::Processed));
}

#[tokio::test]
async fn run_on_empty_store_is_a_noop() {
    let store = Arc::new(InMemoryItemStore::new());

    let report = BatchProcessor::new(store, 4).run().await;

    assert!(report.items.is_empty());
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn vanished_records_count_as_failures_without_aborting_the_batch() {
    let inner = InMemoryItemStore::new();
    seed(&inner, 10).await;

    let store = Arc::new(GhostIdsStore {
        inner,
        ghosts: vec![900, 901, 902],
    });

    let report = BatchProcessor::new(store, 4).run().await;

    assert_eq!(report.items.len(), 10);
    assert_eq!(report.succeeded, 10);
    assert_eq!(report.failed, 3);
}

#[tokio::test]
async fn save_failures_are_isolated_per_unit() {
    let inner = InMemoryItemStore::new();
    let ids = seed(&inner, 10).await;
    let fail_ids: HashSet<u64> = ids.iter().take(2).copied().collect();

    let store = Arc::new(FailingSaveStore { inner, fail_ids: fail_ids.clone() });

    let report = BatchProcessor::new(store.clone(), 4).run().await;

    assert_eq!(report.succeeded, 8);
    assert_eq!(report.failed, 2);
    assert_eq!(report.items.len(), 8);

    // Failed units left their records untouched; siblings were processed.
    for id in ids {
        let item = store.find_by_id(id).await.unwrap().unwrap();
        if fail_ids.contains(&id) {
            assert_eq!(item.status, ItemStatus::Unprocessed);
        } else {
            assert_eq!(item.status, ItemStatus::Processed);
        }
    }
}

#[tokio::test]
async fn repeated_runs_yield_deterministic_totals() {
    let store = Arc::new(InMemoryItemStore::new());
    seed(&store, 30).await;

    let processor = BatchProcessor::new(store, 4);

    for _ in 0..3 {
        let report = processor.run().await;
        assert_eq!(report.succeeded, 30);
        assert_eq!(report.failed, 0);
        assert_eq!(report.items.len(), 30);
    }
}

#[tokio::test]
async fn resolves_only_after_every_unit_is_terminal() {
    let inner = InMemoryItemStore::new();
    seed(&inner, 20).await;
    let store = Arc::new(SlowCountingStore::new(inner));

    let report = BatchProcessor::new(store.clone(), 2).run().await;

    // If the barrier were broken, run() would return while saves are still
    // in flight and this count would fall short.
    assert_eq!(store.completed_saves.load(Ordering::SeqCst), 20);
    assert_eq!(report.succeeded, 20);
    assert_eq!(store.inflight.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn concurrency_stays_within_the_worker_bound() {
    let inner = InMemoryItemStore::new();
    seed(&inner, 30).await;
    let store = Arc::new(SlowCountingStore::new(inner));

    let workers = 3;
    let report = BatchProcessor::new(store.clone(), workers).run().await;

    assert_eq!(report.succeeded, 30);
    assert!(store.max_inflight.load(Ordering::SeqCst) <= workers as u64);
}

#[tokio::test]
async fn process_all_returns_a_handle_that_carries_the_final_list() {
    let store = Arc::new(InMemoryItemStore::new());
    seed(&store, 5).await;

    let handle = BatchProcessor::new(store, 4).process_all();
    let items = handle.await.unwrap();

    assert_eq!(items.len(), 5);
    assert!(items.iter().all(|item| item.status == ItemStatus::Processed));
}
