use thiserror::Error;

/// Failures reported by an [`crate::storage::ItemStore`] backend.
///
/// The in-memory store never produces these; fallible backends (and test
/// doubles standing in for them) do.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
