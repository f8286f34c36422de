//! Registry error types.

use crate::types::{Address, ChangePointer};
use thiserror::Error;

/// Rejection message for a direct owner change to the null address
pub const ZERO_OWNER: &str = "new owner cannot be zero address";

/// Rejection message for a signed owner change to the null address
pub const ZERO_OWNER_SIGNED: &str = "new owner cannot be zero address for signed change";

/// Rejection message for a null delegate
pub const ZERO_DELEGATE: &str = "delegate cannot be zero address";

/// Registry errors
///
/// Every variant rejects the whole transaction: no store write, no pointer
/// advance, no event.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Direct caller is not the identity's controller
    #[error("not current owner: identity={identity}, sender={sender}")]
    NotCurrentOwner { identity: Address, sender: Address },

    /// Signature recovered to someone other than the controller
    #[error("signer is not the current owner: identity={identity}, signer={signer}")]
    SignerNotOwner { identity: Address, signer: Address },

    /// Signature is malformed or does not recover
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// A required address is the null address
    #[error("{0}")]
    ZeroAddress(&'static str),

    /// Delegate type tag is all zeros
    #[error("delegateType cannot be empty")]
    EmptyDelegateType,

    /// Attribute name is all zeros
    #[error("attribute name cannot be empty")]
    EmptyAttributeName,

    /// Requested lifetime is zero
    #[error("validity must be greater than zero")]
    InvalidValidity,

    /// `now + validity` does not fit in a timestamp
    #[error("validity overflows: now={now}, validity={validity}")]
    ValidityOverflow { now: u64, validity: u64 },

    /// Host supplied a position that does not move the identity's pointer forward
    #[error("stale ledger position: position={position}, changed={changed}")]
    StaleLedgerPosition {
        position: ChangePointer,
        changed: ChangePointer,
    },

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] erc1056_storage::StorageError),
}

/// Coarse classification of [`RegistryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller or signer is not the current controller
    Unauthorized,
    /// Null address, empty tag, zero or overflowing lifetime
    InvalidArgument,
    /// Malformed or non-recovering signature
    SignatureInvalid,
    /// Host or storage fault
    Internal,
}

impl RegistryError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::NotCurrentOwner { .. } | RegistryError::SignerNotOwner { .. } => {
                ErrorKind::Unauthorized
            }
            RegistryError::ZeroAddress(_)
            | RegistryError::EmptyDelegateType
            | RegistryError::EmptyAttributeName
            | RegistryError::InvalidValidity
            | RegistryError::ValidityOverflow { .. } => ErrorKind::InvalidArgument,
            RegistryError::InvalidSignature(_) => ErrorKind::SignatureInvalid,
            RegistryError::StaleLedgerPosition { .. } | RegistryError::Storage(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
