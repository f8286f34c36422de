//! Ledger error types.

use erc1056_registry::{Address, ChangePointer, ErrorKind, RegistryError};
use thiserror::Error;

/// Host ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transaction rejected by the registry
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] erc1056_storage::StorageError),

    /// A pointer in the identity's chain has no journal entry
    #[error("history broken: identity={identity}, missing position={position}")]
    BrokenHistory {
        identity: Address,
        position: ChangePointer,
    },
}

impl LedgerError {
    /// Classify the error the same way registry rejections are classified
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Registry(err) => err.kind(),
            LedgerError::Storage(_) | LedgerError::BrokenHistory { .. } => ErrorKind::Internal,
        }
    }
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
