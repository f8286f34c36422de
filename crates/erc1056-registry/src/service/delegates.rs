//! Time-bounded delegate grants.

use crate::{action::Action, errors::*, traits::EventSink, types::*};
use erc1056_storage::{BatchExt, Storage, CF_DELEGATES};

use super::{expiry, Authority, DidRegistryService};

impl<S, E> DidRegistryService<S, E>
where
    S: Storage + 'static,
    E: EventSink + 'static,
{
    pub(super) async fn is_valid_delegate_internal(
        &self,
        identity: Address,
        delegate_type: Bytes32,
        delegate: Address,
        now: u64,
    ) -> Result<bool> {
        let valid_to: Option<u64> = self
            .storage
            .get(CF_DELEGATES, &(identity, delegate_type, delegate))
            .await?;
        Ok(valid_to.is_some_and(|valid_to| valid_to > now))
    }

    pub(super) async fn add_delegate_internal(
        &self,
        ctx: &TxContext,
        identity: Address,
        authority: Authority<'_>,
        delegate_type: Bytes32,
        delegate: Address,
        validity: u64,
    ) -> Result<LoggedEvent> {
        let action = Action::AddDelegate {
            delegate_type,
            delegate,
            validity,
        };
        let prior = self.authorize(ctx, identity, authority, &action).await?;

        if delegate.is_zero() {
            return Err(RegistryError::ZeroAddress(ZERO_DELEGATE));
        }
        if delegate_type.is_zero() {
            return Err(RegistryError::EmptyDelegateType);
        }
        let valid_to = expiry(ctx.timestamp, validity)?;

        let mut batch = self.storage.batch();
        batch.put(CF_DELEGATES, &(identity, delegate_type, delegate), &valid_to)?;

        let event = RegistryEvent::DelegateChanged {
            identity,
            delegate_type,
            delegate,
            valid_to,
            previous_change: prior,
        };
        self.commit_change(batch, ctx, event).await
    }

    /// Expire the grant at the current time, whether or not it existed
    pub(super) async fn revoke_delegate_internal(
        &self,
        ctx: &TxContext,
        identity: Address,
        authority: Authority<'_>,
        delegate_type: Bytes32,
        delegate: Address,
    ) -> Result<LoggedEvent> {
        let action = Action::RevokeDelegate {
            delegate_type,
            delegate,
        };
        let prior = self.authorize(ctx, identity, authority, &action).await?;

        let mut batch = self.storage.batch();
        batch.put(
            CF_DELEGATES,
            &(identity, delegate_type, delegate),
            &ctx.timestamp,
        )?;

        let event = RegistryEvent::DelegateChanged {
            identity,
            delegate_type,
            delegate,
            valid_to: 0,
            previous_change: prior,
        };
        self.commit_change(batch, ctx, event).await
    }
}
