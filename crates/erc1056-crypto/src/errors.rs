//! Cryptographic error types.

use thiserror::Error;

/// Cryptographic operation errors
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid key material
    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),

    /// Recovery id (`v`) outside 0, 1, 27, 28
    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// r/s do not form a valid signature
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Signature uses the upper half of the curve order for `s`
    #[error("Signature s value is not in the lower half order")]
    HighS,

    /// Public key recovery failed
    #[error("Recovery failed: {0}")]
    RecoveryFailed(String),

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Invalid input data
    #[error("Invalid input data: {0}")]
    InvalidInput(String),
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;
