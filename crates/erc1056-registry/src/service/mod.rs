//! Registry service implementation.

mod attributes;
mod authorization;
mod change_pointer;
mod delegates;
mod ownership;

pub(crate) use authorization::Authority;

use crate::{action::Action, errors::*, traits::*, types::*};
use async_trait::async_trait;
use erc1056_crypto::EcdsaSignature;
use erc1056_storage::Storage;
use std::sync::Arc;

/// ERC1056 registry over an injected store and event sink
pub struct DidRegistryService<S, E>
where
    S: Storage,
    E: EventSink,
{
    pub(super) storage: Arc<S>,
    pub(super) events: Arc<E>,
    pub(super) registry_address: Address,
}

impl<S, E> DidRegistryService<S, E>
where
    S: Storage,
    E: EventSink,
{
    /// Create a registry identified by `registry_address` in signed payloads
    pub fn new(storage: Arc<S>, events: Arc<E>, registry_address: Address) -> Self {
        Self {
            storage,
            events,
            registry_address,
        }
    }

    /// Address bound into every signed payload
    pub fn registry_address(&self) -> Address {
        self.registry_address
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn events(&self) -> &Arc<E> {
        &self.events
    }
}

#[async_trait]
impl<S, E> DidRegistry for DidRegistryService<S, E>
where
    S: Storage + 'static,
    E: EventSink + 'static,
{
    async fn current_controller(&self, identity: Address) -> Result<Address> {
        self.current_controller_internal(identity).await
    }

    async fn last_change_pointer(&self, identity: Address) -> Result<ChangePointer> {
        self.last_change_pointer_internal(identity).await
    }

    async fn is_valid_delegate(
        &self,
        identity: Address,
        delegate_type: Bytes32,
        delegate: Address,
        now: u64,
    ) -> Result<bool> {
        self.is_valid_delegate_internal(identity, delegate_type, delegate, now)
            .await
    }

    async fn signing_digest(&self, identity: Address, action: &Action) -> Result<[u8; 32]> {
        let nonce = self.last_change_pointer_internal(identity).await?;
        Ok(crate::action::signing_digest(
            &self.registry_address,
            nonce,
            action,
        ))
    }

    async fn change_owner(
        &self,
        ctx: &TxContext,
        identity: Address,
        new_owner: Address,
    ) -> Result<LoggedEvent> {
        self.change_owner_internal(ctx, identity, Authority::Direct(ctx.sender), new_owner)
            .await
    }

    async fn change_owner_signed(
        &self,
        ctx: &TxContext,
        identity: Address,
        signature: &EcdsaSignature,
        new_owner: Address,
    ) -> Result<LoggedEvent> {
        self.change_owner_internal(ctx, identity, Authority::Signed(signature), new_owner)
            .await
    }

    async fn add_delegate(
        &self,
        ctx: &TxContext,
        identity: Address,
        delegate_type: Bytes32,
        delegate: Address,
        validity: u64,
    ) -> Result<LoggedEvent> {
        self.add_delegate_internal(
            ctx,
            identity,
            Authority::Direct(ctx.sender),
            delegate_type,
            delegate,
            validity,
        )
        .await
    }

    async fn add_delegate_signed(
        &self,
        ctx: &TxContext,
        identity: Address,
        signature: &EcdsaSignature,
        delegate_type: Bytes32,
        delegate: Address,
        validity: u64,
    ) -> Result<LoggedEvent> {
        self.add_delegate_internal(
            ctx,
            identity,
            Authority::Signed(signature),
            delegate_type,
            delegate,
            validity,
        )
        .await
    }

    async fn revoke_delegate(
        &self,
        ctx: &TxContext,
        identity: Address,
        delegate_type: Bytes32,
        delegate: Address,
    ) -> Result<LoggedEvent> {
        self.revoke_delegate_internal(
            ctx,
            identity,
            Authority::Direct(ctx.sender),
            delegate_type,
            delegate,
        )
        .await
    }

    async fn revoke_delegate_signed(
        &self,
        ctx: &TxContext,
        identity: Address,
        signature: &EcdsaSignature,
        delegate_type: Bytes32,
        delegate: Address,
    ) -> Result<LoggedEvent> {
        self.revoke_delegate_internal(
            ctx,
            identity,
            Authority::Signed(signature),
            delegate_type,
            delegate,
        )
        .await
    }

    async fn set_attribute(
        &self,
        ctx: &TxContext,
        identity: Address,
        name: Bytes32,
        value: Vec<u8>,
        validity: u64,
    ) -> Result<LoggedEvent> {
        self.set_attribute_internal(
            ctx,
            identity,
            Authority::Direct(ctx.sender),
            name,
            value,
            validity,
        )
        .await
    }

    async fn set_attribute_signed(
        &self,
        ctx: &TxContext,
        identity: Address,
        signature: &EcdsaSignature,
        name: Bytes32,
        value: Vec<u8>,
        validity: u64,
    ) -> Result<LoggedEvent> {
        self.set_attribute_internal(
            ctx,
            identity,
            Authority::Signed(signature),
            name,
            value,
            validity,
        )
        .await
    }

    async fn revoke_attribute(
        &self,
        ctx: &TxContext,
        identity: Address,
        name: Bytes32,
        value: Vec<u8>,
    ) -> Result<LoggedEvent> {
        self.revoke_attribute_internal(ctx, identity, Authority::Direct(ctx.sender), name, value)
            .await
    }

    async fn revoke_attribute_signed(
        &self,
        ctx: &TxContext,
        identity: Address,
        signature: &EcdsaSignature,
        name: Bytes32,
        value: Vec<u8>,
    ) -> Result<LoggedEvent> {
        self.revoke_attribute_internal(ctx, identity, Authority::Signed(signature), name, value)
            .await
    }
}

/// Expiry of a grant or assertion made at `now` for `validity` seconds
pub(super) fn expiry(now: u64, validity: u64) -> Result<u64> {
    if validity == 0 {
        return Err(RegistryError::InvalidValidity);
    }
    now.checked_add(validity)
        .ok_or(RegistryError::ValidityOverflow { now, validity })
}
