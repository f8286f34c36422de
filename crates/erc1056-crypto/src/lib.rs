//! # erc1056-crypto
//!
//! Cryptographic primitives for the ERC1056 identity registry.
//!
//! - Keccak-256 hashing (the EVM flavour, not NIST SHA3-256)
//! - EIP-191 personal message digests
//! - secp256k1 recoverable signatures and Ethereum address recovery

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

pub use errors::{CryptoError, Result};
pub use hashing::*;
pub use signatures::*;
