//! # erc1056-storage
//!
//! Durable key-value storage for the ERC1056 registry and its host ledger.
//!
//! Keys and values are bincode-encoded. Composite keys are tuples, so a
//! shorter tuple prefix (e.g. just the identity) selects a contiguous range.

#![warn(clippy::all)]

pub mod column_families;
pub mod errors;
pub mod rocksdb_impl;
pub mod traits;

pub use column_families::*;
pub use errors::{Result, StorageError};
pub use rocksdb_impl::RocksDbStorage;
pub use traits::{Batch, BatchExt, Storage};
