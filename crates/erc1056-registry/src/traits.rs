//! Registry trait definitions.

use crate::{action::Action, errors::Result, types::*};
use async_trait::async_trait;
use erc1056_crypto::EcdsaSignature;
use erc1056_storage::Batch;

/// Destination of emitted events
///
/// Injected into the registry so the host decides how events are kept. The
/// event is staged into the same batch as the state change it describes.
pub trait EventSink: Send + Sync {
    /// Stage an event into the mutation batch
    fn append(&self, batch: &mut dyn Batch, event: &LoggedEvent) -> Result<()>;

    /// Called after the batch holding `event` committed
    fn committed(&self, _event: &LoggedEvent) {}
}

/// Sink that drops every event
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn append(&self, _batch: &mut dyn Batch, _event: &LoggedEvent) -> Result<()> {
        Ok(())
    }
}

/// ERC1056 registry operations
///
/// Reads are side-effect free. Each mutation either commits its store write,
/// pointer advance and event together, or changes nothing.
#[async_trait]
pub trait DidRegistry: Send + Sync {
    /// Controller of `identity`; the identity itself when never reassigned
    async fn current_controller(&self, identity: Address) -> Result<Address>;

    /// Position of the last change to `identity` (zero when never changed)
    async fn last_change_pointer(&self, identity: Address) -> Result<ChangePointer>;

    /// Whether the grant exists and expires strictly after `now`
    async fn is_valid_delegate(
        &self,
        identity: Address,
        delegate_type: Bytes32,
        delegate: Address,
        now: u64,
    ) -> Result<bool>;

    /// Digest the controller must sign to authorize `action` at the current nonce
    async fn signing_digest(&self, identity: Address, action: &Action) -> Result<[u8; 32]>;

    /// Reassign the controller (caller must be the current controller)
    async fn change_owner(
        &self,
        ctx: &TxContext,
        identity: Address,
        new_owner: Address,
    ) -> Result<LoggedEvent>;

    /// Reassign the controller on the strength of the controller's signature
    async fn change_owner_signed(
        &self,
        ctx: &TxContext,
        identity: Address,
        signature: &EcdsaSignature,
        new_owner: Address,
    ) -> Result<LoggedEvent>;

    /// Grant or refresh a delegate for `validity` seconds
    async fn add_delegate(
        &self,
        ctx: &TxContext,
        identity: Address,
        delegate_type: Bytes32,
        delegate: Address,
        validity: u64,
    ) -> Result<LoggedEvent>;

    /// Signed variant of [`DidRegistry::add_delegate`]
    async fn add_delegate_signed(
        &self,
        ctx: &TxContext,
        identity: Address,
        signature: &EcdsaSignature,
        delegate_type: Bytes32,
        delegate: Address,
        validity: u64,
    ) -> Result<LoggedEvent>;

    /// Expire a delegate immediately
    async fn revoke_delegate(
        &self,
        ctx: &TxContext,
        identity: Address,
        delegate_type: Bytes32,
        delegate: Address,
    ) -> Result<LoggedEvent>;

    /// Signed variant of [`DidRegistry::revoke_delegate`]
    async fn revoke_delegate_signed(
        &self,
        ctx: &TxContext,
        identity: Address,
        signature: &EcdsaSignature,
        delegate_type: Bytes32,
        delegate: Address,
    ) -> Result<LoggedEvent>;

    /// Emit an attribute valid for `validity` seconds
    async fn set_attribute(
        &self,
        ctx: &TxContext,
        identity: Address,
        name: Bytes32,
        value: Vec<u8>,
        validity: u64,
    ) -> Result<LoggedEvent>;

    /// Signed variant of [`DidRegistry::set_attribute`]
    async fn set_attribute_signed(
        &self,
        ctx: &TxContext,
        identity: Address,
        signature: &EcdsaSignature,
        name: Bytes32,
        value: Vec<u8>,
        validity: u64,
    ) -> Result<LoggedEvent>;

    /// Emit a zero-expiry event for this exact attribute value
    async fn revoke_attribute(
        &self,
        ctx: &TxContext,
        identity: Address,
        name: Bytes32,
        value: Vec<u8>,
    ) -> Result<LoggedEvent>;

    /// Signed variant of [`DidRegistry::revoke_attribute`]
    async fn revoke_attribute_signed(
        &self,
        ctx: &TxContext,
        identity: Address,
        signature: &EcdsaSignature,
        name: Bytes32,
        value: Vec<u8>,
    ) -> Result<LoggedEvent>;
}
