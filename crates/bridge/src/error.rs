//! Error types for dispatching a run.

use lpjguess_loader::LoadError;
use thiserror::Error;

/// Failure of [`Bridge::run`](crate::Bridge::run).
///
/// Both variants are transparent: the caller sees the original error and its
/// original kind.
#[derive(Debug, Error)]
pub enum RunError<E: std::error::Error + 'static> {
    /// The engine runtime could not be loaded.
    #[error(transparent)]
    Runtime(#[from] LoadError),

    /// The engine raised an error during the run.
    #[error(transparent)]
    Engine(E),
}

impl<E: std::error::Error + 'static> RunError<E> {
    /// The engine's error, if the run got that far.
    pub fn into_engine(self) -> Option<E> {
        match self {
            RunError::Engine(e) => Some(e),
            RunError::Runtime(_) => None,
        }
    }
}
