//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by session operations.
///
/// The two state variants are out-of-protocol calls: programming errors
/// surfaced synchronously, not recoverable conditions. A front end guards
/// against them by only offering the actions valid in the current state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no question is awaiting an answer")]
    NotAwaitingAnswer,
    #[error("no answer has been revealed to advance past")]
    NotRevealed,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StatsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
