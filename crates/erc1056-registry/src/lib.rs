//! # erc1056-registry
//!
//! State-transition core of an ERC1056 lightweight identity registry.
//!
//! - Ownership: every address controls itself until `change_owner` says otherwise
//! - Delegates: time-bounded grants per (identity, delegate type, delegate)
//! - Attributes: emitted as events only, never stored
//! - Signed meta-transactions bound to the identity's change pointer
//! - Change pointers linking each identity's events into a backward chain

#![warn(clippy::all)]

pub mod action;
pub mod errors;
mod service;
pub mod traits;
pub mod types;

#[cfg(test)]
mod tests;

pub use action::{payload_hash, signing_digest, Action};
pub use errors::{ErrorKind, RegistryError, Result};
pub use service::DidRegistryService;
pub use traits::{DidRegistry, EventSink, NoopEventSink};
pub use types::*;

pub use erc1056_crypto::EcdsaSignature;
