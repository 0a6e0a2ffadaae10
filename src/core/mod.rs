pub mod error;
pub mod item;

pub use error::{StoreError, StoreResult};
pub use item::{Item, ItemStatus};
