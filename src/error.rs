use thiserror::Error;

use crate::{
    dao::{GameStateError, ImportError, storage::StorageError},
    state::{EditLocked, SheetError},
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend failed; the affected write is lost, nothing is
    /// retried.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// A history-mutating operation was attempted outside editing mode.
    #[error("sheet is view-only: {0}")]
    EditLocked(#[source] EditLocked),
    /// An operation addressed a player or round that does not exist.
    #[error("invalid input: {0}")]
    InvalidInput(#[source] SheetError),
    /// The import document could not be parsed; the archive is unchanged.
    #[error("import rejected: {0}")]
    ImportRejected(#[source] serde_json::Error),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<GameStateError> for ServiceError {
    fn from(err: GameStateError) -> Self {
        match err {
            GameStateError::Storage(source) => ServiceError::Unavailable(source),
            GameStateError::EditLocked(source) => ServiceError::EditLocked(source),
            GameStateError::Sheet(source) => ServiceError::InvalidInput(source),
        }
    }
}

impl From<ImportError> for ServiceError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Malformed(source) => ServiceError::ImportRejected(source),
            ImportError::Storage(source) => ServiceError::Unavailable(source),
        }
    }
}
