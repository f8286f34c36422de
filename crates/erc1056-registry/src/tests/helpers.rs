//! Test helpers for registry service tests.

use crate::*;
use erc1056_crypto::Secp256k1KeyPair;
use erc1056_storage::{Batch, RocksDbStorage, StorageError};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const REGISTRY: Address = Address([0x10; 20]);

/// Sink that remembers what it was asked to stage and what committed
#[derive(Default)]
pub struct RecordingSink {
    staged: Mutex<Vec<LoggedEvent>>,
    committed: Mutex<Vec<LoggedEvent>>,
}

impl RecordingSink {
    pub fn committed_events(&self) -> Vec<LoggedEvent> {
        self.committed.lock().unwrap().clone()
    }

    pub fn staged_count(&self) -> usize {
        self.staged.lock().unwrap().len()
    }
}

impl EventSink for RecordingSink {
    fn append(&self, _batch: &mut dyn Batch, event: &LoggedEvent) -> Result<()> {
        self.staged.lock().unwrap().push(event.clone());
        Ok(())
    }

    fn committed(&self, event: &LoggedEvent) {
        self.committed.lock().unwrap().push(event.clone());
    }
}

/// Sink whose journal is unavailable
pub struct FailingSink;

impl EventSink for FailingSink {
    fn append(&self, _batch: &mut dyn Batch, _event: &LoggedEvent) -> Result<()> {
        Err(RegistryError::Storage(StorageError::Database(
            "journal unavailable".to_string(),
        )))
    }
}

pub type TestRegistry = DidRegistryService<RocksDbStorage, RecordingSink>;

/// Helper to create test storage
pub fn create_test_storage() -> (Arc<RocksDbStorage>, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = RocksDbStorage::open(temp_dir.path()).unwrap();
    (Arc::new(db), temp_dir)
}

/// Helper to create a registry with a recording sink
pub fn create_test_registry() -> (TestRegistry, Arc<RecordingSink>, TempDir) {
    let (storage, temp_dir) = create_test_storage();
    let sink = Arc::new(RecordingSink::default());
    let registry = DidRegistryService::new(storage, Arc::clone(&sink), REGISTRY);
    (registry, sink, temp_dir)
}

/// Hands out transaction contexts at increasing heights
pub struct Blocks {
    height: u64,
    pub timestamp: u64,
}

impl Blocks {
    pub fn new() -> Self {
        Self {
            height: 0,
            timestamp: 1_700_000_000,
        }
    }

    pub fn next(&mut self, sender: Address) -> TxContext {
        self.height += 1;
        TxContext {
            sender,
            position: ChangePointer(self.height),
            timestamp: self.timestamp,
        }
    }

    pub fn advance(&mut self, seconds: u64) {
        self.timestamp += seconds;
    }
}

/// Deterministic key pair and its address
pub fn keypair(seed: u8) -> (Secp256k1KeyPair, Address) {
    let keypair = Secp256k1KeyPair::from_secret_bytes(&[seed; 32]).unwrap();
    let address = Address(keypair.address());
    (keypair, address)
}

pub fn address(byte: u8) -> Address {
    Address([byte; 20])
}

pub fn tag(text: &str) -> Bytes32 {
    Bytes32::from_short_str(text).unwrap()
}

/// Sign `action` for `identity` at the identity's current nonce
pub async fn sign<R: DidRegistry>(
    registry: &R,
    keypair: &Secp256k1KeyPair,
    identity: Address,
    action: &Action,
) -> EcdsaSignature {
    let digest = registry.signing_digest(identity, action).await.unwrap();
    keypair.sign_digest(&digest).unwrap()
}
