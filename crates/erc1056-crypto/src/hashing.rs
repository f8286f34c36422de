//! Keccak-256 and EIP-191 digests.

use sha3::{Digest, Keccak256};

/// Prefix of an EIP-191 `personal_sign` message whose body is a 32-byte hash
pub const EIP191_HASH_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Compute Keccak256 hash
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute Keccak256 over several slices without concatenating them first
pub fn keccak256_concat(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Digest signed by `personal_sign` when the message is a 32-byte hash
///
/// `keccak256("\x19Ethereum Signed Message:\n32" ‖ hash)`
pub fn eth_signed_message_hash(hash: &[u8; 32]) -> [u8; 32] {
    keccak256_concat(&[EIP191_HASH_PREFIX, &hash[..]])
}
