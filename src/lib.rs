// ============================================================================
// Itemflow Library
// ============================================================================

pub mod config;
pub mod core;
pub mod facade;
pub mod processor;
pub mod storage;
pub mod web;

// Re-export main types for convenience
pub use crate::core::{Item, ItemStatus, StoreError, StoreResult};
pub use crate::facade::ItemService;
pub use crate::processor::{BatchProcessor, BatchReport};
pub use crate::storage::{InMemoryItemStore, ItemStore};
pub use crate::web::{AppState, build_router};
