//! Concurrent batch processing over every stored item.
//!
//! One unit of work is spawned per snapshotted id; a semaphore bounds how
//! many run at once. Each unit owns its fetched copy of the record end-to-end
//! and touches only three shared aggregates: two atomic counters and one
//! lock-guarded result list. The run resolves only after every unit has
//! reached a terminal state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::core::{Item, ItemStatus};
use crate::storage::ItemStore;

/// Aggregate outcome of one batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Every item that was fetched, marked processed and saved back.
    pub items: Vec<Item>,
    pub succeeded: u64,
    pub failed: u64,
}

impl BatchReport {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            succeeded: 0,
            failed: 0,
        }
    }
}

/// Orchestrates concurrent per-item processing against the store.
#[derive(Clone)]
pub struct BatchProcessor {
    store: Arc<dyn ItemStore>,
    workers: usize,
}

impl BatchProcessor {
    pub fn new(store: Arc<dyn ItemStore>, workers: usize) -> Self {
        Self {
            store,
            workers: workers.max(1),
        }
    }

    /// Kicks off a full batch run on the runtime and returns its handle.
    ///
    /// The caller gets the handle immediately; awaiting it yields the
    /// processed items once every unit is terminal. The run is never
    /// cancelled from this side.
    pub fn process_all(&self) -> JoinHandle<Vec<Item>> {
        let processor = self.clone();
        tokio::spawn(async move { processor.run().await.items })
    }

    /// Executes the batch: snapshot ids, fan out one unit per id, wait for
    /// all of them, aggregate.
    pub async fn run(&self) -> BatchReport {
        let ids = match self.store.find_all_ids().await {
            Ok(ids) => ids,
            Err(err) => {
                error!(error = %err, "failed to snapshot item ids");
                return BatchReport::empty();
            }
        };

        let succeeded = Arc::new(AtomicU64::new(0));
        let failed = Arc::new(AtomicU64::new(0));
        let results = Arc::new(Mutex::new(Vec::with_capacity(ids.len())));
        let permits = Arc::new(Semaphore::new(self.workers));

        let mut handles = Vec::with_capacity(ids.len());
        for id in ids {
            let store = Arc::clone(&self.store);
            let succeeded = Arc::clone(&succeeded);
            let failed = Arc::clone(&failed);
            let results = Arc::clone(&results);
            let permits = Arc::clone(&permits);

            handles.push(tokio::spawn(async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        failed.fetch_add(1, Ordering::Relaxed);
                        error!(item_id = id, "worker pool closed before unit could run");
                        return;
                    }
                };

                process_one(store.as_ref(), id, &succeeded, &failed, &results).await;
            }));
        }

        // The resolve barrier: every unit must be terminal before the
        // aggregates are read.
        for outcome in join_all(handles).await {
            if let Err(err) = outcome {
                failed.fetch_add(1, Ordering::Relaxed);
                error!(error = %err, "processing unit aborted before completing");
            }
        }

        let succeeded = succeeded.load(Ordering::Relaxed);
        let failed = failed.load(Ordering::Relaxed);
        info!(succeeded, failed, "batch processing complete");

        let items = match Arc::try_unwrap(results) {
            Ok(collected) => collected.into_inner(),
            Err(_) => {
                // The counters above still carry the true tally; the caller
                // gets an empty list when aggregation itself fails.
                error!("failed to collect batch results, returning empty list");
                Vec::new()
            }
        };

        BatchReport {
            items,
            succeeded,
            failed,
        }
    }
}

/// One unit of work: fetch, mark processed, save.
///
/// Terminal states: saved (success), not found (failure), store error on
/// fetch or save (failure). Failures are absorbed here and never reach
/// sibling units.
async fn process_one(
    store: &dyn ItemStore,
    id: u64,
    succeeded: &AtomicU64,
    failed: &AtomicU64,
    results: &Mutex<Vec<Item>>,
) {
    match store.find_by_id(id).await {
        Ok(Some(mut item)) => {
            item.status = ItemStatus::Processed;
            match store.save(item).await {
                Ok(saved) => {
                    results.lock().await.push(saved);
                    succeeded.fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    error!(item_id = id, error = %err, "failed to save processed item");
                }
            }
        }
        Ok(None) => {
            // Expected race: the record vanished between the id snapshot and
            // this unit running.
            failed.fetch_add(1, Ordering::Relaxed);
            warn!(item_id = id, "item not found during batch processing");
        }
        Err(err) => {
            failed.fetch_add(1, Ordering::Relaxed);
            error!(item_id = id, error = %err, "failed to fetch item");
        }
    }
}
