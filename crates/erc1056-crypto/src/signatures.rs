//! secp256k1 recoverable signatures and Ethereum address recovery.

use crate::{errors::*, hashing::keccak256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};

/// Length of an Ethereum address in bytes
pub const ADDRESS_LENGTH: usize = 20;

/// Length of a flat `r ‖ s ‖ v` signature in bytes
pub const SIGNATURE_LENGTH: usize = 65;

/// Recoverable ECDSA signature in the `(v, r, s)` form sent to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcdsaSignature {
    /// Recovery id, 27/28 (0/1 also accepted)
    pub v: u8,
    /// Signature `r` scalar, big-endian
    pub r: [u8; 32],
    /// Signature `s` scalar, big-endian
    pub s: [u8; 32],
}

impl EcdsaSignature {
    /// Parse a flat 65-byte `r ‖ s ‖ v` signature
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(CryptoError::InvalidInput(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_LENGTH,
                bytes.len()
            )));
        }

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);

        Ok(Self { v: bytes[64], r, s })
    }

    /// Flat 65-byte `r ‖ s ‖ v` encoding
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Parse a `0x`-prefixed (or bare) hex string of the flat encoding
    pub fn from_hex(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = hex::decode(hex_part)
            .map_err(|e| CryptoError::InvalidInput(format!("invalid signature hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// `0x`-prefixed hex of the flat encoding
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    fn recovery_id(&self) -> Result<RecoveryId> {
        let normalized = match self.v {
            0 | 1 => self.v,
            27 | 28 => self.v - 27,
            other => return Err(CryptoError::InvalidRecoveryId(other)),
        };
        RecoveryId::from_byte(normalized).ok_or(CryptoError::InvalidRecoveryId(self.v))
    }

    fn to_k256(&self) -> Result<Signature> {
        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(&self.r);
        rs[32..].copy_from_slice(&self.s);

        let signature =
            Signature::from_slice(&rs).map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;

        // A high-s signature has a twin with the same signer; only the low form is accepted.
        if signature.normalize_s().is_some() {
            return Err(CryptoError::HighS);
        }

        Ok(signature)
    }
}

/// Recover the Ethereum address that produced `signature` over `digest`
///
/// `digest` is the exact 32-byte prehash that was signed (for personal
/// messages, the output of [`crate::eth_signed_message_hash`]).
pub fn recover_address(digest: &[u8; 32], signature: &EcdsaSignature) -> Result<[u8; ADDRESS_LENGTH]> {
    let recovery_id = signature.recovery_id()?;
    let sig = signature.to_k256()?;

    let verifying_key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))?;

    Ok(address_of(&verifying_key))
}

/// Ethereum address of a public key: last 20 bytes of keccak256 of the
/// uncompressed point without its `0x04` tag
pub fn address_of(verifying_key: &VerifyingKey) -> [u8; ADDRESS_LENGTH] {
    let point = verifying_key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);

    let mut address = [0u8; ADDRESS_LENGTH];
    address.copy_from_slice(&hash[12..]);
    address
}

/// secp256k1 key pair able to produce registry signatures
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Build a key pair from a 32-byte secret scalar
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Result<Self> {
        let signing_key = SigningKey::from_slice(secret)
            .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
        Ok(Self { signing_key })
    }

    /// Ethereum address controlled by this key
    pub fn address(&self) -> [u8; ADDRESS_LENGTH] {
        address_of(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte prehash, returning `v` in the 27/28 convention
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<EcdsaSignature> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

        let bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        Ok(EcdsaSignature {
            v: 27 + recovery_id.to_byte(),
            r,
            s,
        })
    }
}

impl std::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("address", &hex::encode(self.address()))
            .finish_non_exhaustive()
    }
}
