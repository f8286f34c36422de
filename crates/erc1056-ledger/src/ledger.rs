//! Single-process transaction host.

use crate::{clock::Clock, errors::*, journal::EventJournal};
use erc1056_registry::{
    Action, Address, Bytes32, ChangePointer, DidRegistry, DidRegistryService, EcdsaSignature,
    LoggedEvent, TxContext,
};
use erc1056_storage::{Storage, CF_LEDGER};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

const HEAD_KEY: &str = "head";

/// Last block produced by the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct LedgerHead {
    height: u64,
    timestamp: u64,
}

/// Orders transactions against one registry
///
/// Every transaction gets its own block: a height one above the previous
/// (consumed even when the registry rejects the transaction) and a
/// timestamp that never goes backward.
pub struct LocalLedger<S, C>
where
    S: Storage + 'static,
    C: Clock,
{
    storage: Arc<S>,
    registry: DidRegistryService<S, EventJournal<S>>,
    journal: Arc<EventJournal<S>>,
    clock: Arc<C>,
    head: Mutex<LedgerHead>,
}

impl<S, C> LocalLedger<S, C>
where
    S: Storage + 'static,
    C: Clock,
{
    /// Open a ledger over `storage`, resuming from its stored head
    pub async fn open(
        storage: Arc<S>,
        clock: Arc<C>,
        registry_address: Address,
        event_capacity: usize,
    ) -> Result<Self> {
        let head: Option<LedgerHead> = storage.get(CF_LEDGER, &HEAD_KEY).await?;
        let head = head.unwrap_or_default();
        debug!(height = head.height, "Opened ledger");

        let journal = Arc::new(EventJournal::new(Arc::clone(&storage), event_capacity));
        let registry =
            DidRegistryService::new(Arc::clone(&storage), Arc::clone(&journal), registry_address);

        Ok(Self {
            storage,
            registry,
            journal,
            clock,
            head: Mutex::new(head),
        })
    }

    pub fn registry(&self) -> &DidRegistryService<S, EventJournal<S>> {
        &self.registry
    }

    pub fn journal(&self) -> &Arc<EventJournal<S>> {
        &self.journal
    }

    pub fn registry_address(&self) -> Address {
        self.registry.registry_address()
    }

    /// Height of the last block
    pub async fn height(&self) -> u64 {
        self.head.lock().await.height
    }

    /// Current ledger time
    pub async fn now(&self) -> u64 {
        let head = self.head.lock().await;
        self.clock.now().max(head.timestamp)
    }

    /// Run one transaction in the next block
    async fn transact<F, Fut>(&self, sender: Address, run: F) -> Result<LoggedEvent>
    where
        F: FnOnce(TxContext) -> Fut,
        Fut: Future<Output = erc1056_registry::Result<LoggedEvent>>,
    {
        let mut head = self.head.lock().await;
        let next = LedgerHead {
            height: head.height + 1,
            timestamp: self.clock.now().max(head.timestamp),
        };
        self.storage.put(CF_LEDGER, &HEAD_KEY, &next).await?;
        *head = next;

        let ctx = TxContext {
            sender,
            position: ChangePointer(next.height),
            timestamp: next.timestamp,
        };
        Ok(run(ctx).await?)
    }

    pub async fn current_controller(&self, identity: Address) -> Result<Address> {
        Ok(self.registry.current_controller(identity).await?)
    }

    pub async fn last_change_pointer(&self, identity: Address) -> Result<ChangePointer> {
        Ok(self.registry.last_change_pointer(identity).await?)
    }

    /// Whether the delegate is valid at the current ledger time
    pub async fn is_valid_delegate(
        &self,
        identity: Address,
        delegate_type: Bytes32,
        delegate: Address,
    ) -> Result<bool> {
        let now = self.now().await;
        Ok(self
            .registry
            .is_valid_delegate(identity, delegate_type, delegate, now)
            .await?)
    }

    /// Digest the controller signs to authorize `action` in the next change
    pub async fn signing_digest(&self, identity: Address, action: &Action) -> Result<[u8; 32]> {
        Ok(self.registry.signing_digest(identity, action).await?)
    }

    pub async fn change_owner(
        &self,
        sender: Address,
        identity: Address,
        new_owner: Address,
    ) -> Result<LoggedEvent> {
        self.transact(sender, |ctx| async move {
            self.registry.change_owner(&ctx, identity, new_owner).await
        })
        .await
    }

    pub async fn change_owner_signed(
        &self,
        sender: Address,
        identity: Address,
        signature: &EcdsaSignature,
        new_owner: Address,
    ) -> Result<LoggedEvent> {
        self.transact(sender, |ctx| async move {
            self.registry
                .change_owner_signed(&ctx, identity, signature, new_owner)
                .await
        })
        .await
    }

    pub async fn add_delegate(
        &self,
        sender: Address,
        identity: Address,
        delegate_type: Bytes32,
        delegate: Address,
        validity: u64,
    ) -> Result<LoggedEvent> {
        self.transact(sender, |ctx| async move {
            self.registry
                .add_delegate(&ctx, identity, delegate_type, delegate, validity)
                .await
        })
        .await
    }

    pub async fn add_delegate_signed(
        &self,
        sender: Address,
        identity: Address,
        signature: &EcdsaSignature,
        delegate_type: Bytes32,
        delegate: Address,
        validity: u64,
    ) -> Result<LoggedEvent> {
        self.transact(sender, |ctx| async move {
            self.registry
                .add_delegate_signed(&ctx, identity, signature, delegate_type, delegate, validity)
                .await
        })
        .await
    }

    pub async fn revoke_delegate(
        &self,
        sender: Address,
        identity: Address,
        delegate_type: Bytes32,
        delegate: Address,
    ) -> Result<LoggedEvent> {
        self.transact(sender, |ctx| async move {
            self.registry
                .revoke_delegate(&ctx, identity, delegate_type, delegate)
                .await
        })
        .await
    }

    pub async fn revoke_delegate_signed(
        &self,
        sender: Address,
        identity: Address,
        signature: &EcdsaSignature,
        delegate_type: Bytes32,
        delegate: Address,
    ) -> Result<LoggedEvent> {
        self.transact(sender, |ctx| async move {
            self.registry
                .revoke_delegate_signed(&ctx, identity, signature, delegate_type, delegate)
                .await
        })
        .await
    }

    pub async fn set_attribute(
        &self,
        sender: Address,
        identity: Address,
        name: Bytes32,
        value: Vec<u8>,
        validity: u64,
    ) -> Result<LoggedEvent> {
        self.transact(sender, |ctx| async move {
            self.registry
                .set_attribute(&ctx, identity, name, value, validity)
                .await
        })
        .await
    }

    pub async fn set_attribute_signed(
        &self,
        sender: Address,
        identity: Address,
        signature: &EcdsaSignature,
        name: Bytes32,
        value: Vec<u8>,
        validity: u64,
    ) -> Result<LoggedEvent> {
        self.transact(sender, |ctx| async move {
            self.registry
                .set_attribute_signed(&ctx, identity, signature, name, value, validity)
                .await
        })
        .await
    }

    pub async fn revoke_attribute(
        &self,
        sender: Address,
        identity: Address,
        name: Bytes32,
        value: Vec<u8>,
    ) -> Result<LoggedEvent> {
        self.transact(sender, |ctx| async move {
            self.registry
                .revoke_attribute(&ctx, identity, name, value)
                .await
        })
        .await
    }

    pub async fn revoke_attribute_signed(
        &self,
        sender: Address,
        identity: Address,
        signature: &EcdsaSignature,
        name: Bytes32,
        value: Vec<u8>,
    ) -> Result<LoggedEvent> {
        self.transact(sender, |ctx| async move {
            self.registry
                .revoke_attribute_signed(&ctx, identity, signature, name, value)
                .await
        })
        .await
    }
}
