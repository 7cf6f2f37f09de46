use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::AnswerLedger;

/// Fixed storage identifier for the one persisted ledger blob.
///
/// Matches the key the answer history has always been stored under, so an
/// exported blob from an older deployment stays readable.
pub const LEDGER_STORAGE_KEY: &str = "quiz-stats";

/// Errors surfaced by storage adapters.
///
/// The engine propagates these unchanged; there is no retry or silent
/// degradation below this boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the answer ledger.
///
/// The ledger is a single named blob: reads return the whole mapping (empty
/// when nothing was ever written), writes replace it wholesale. There are no
/// merge semantics; the single-writer assumption lives with the caller.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Load the full ledger, or an empty one when no blob exists yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the blob cannot be read or decoded.
    async fn load_ledger(&self) -> Result<AnswerLedger, StorageError>;

    /// Replace the persisted ledger with the given state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the blob cannot be encoded or written.
    async fn save_ledger(&self, ledger: &AnswerLedger) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    ledger: Arc<Mutex<AnswerLedger>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryRepository {
    async fn load_ledger(&self) -> Result<AnswerLedger, StorageError> {
        let guard = self
            .ledger
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_ledger(&self, ledger: &AnswerLedger) -> Result<(), StorageError> {
        let mut guard = self
            .ledger
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = ledger.clone();
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub ledger: Arc<dyn LedgerRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let ledger: Arc<dyn LedgerRepository> = Arc::new(InMemoryRepository::new());
        Self { ledger }
    }
}
