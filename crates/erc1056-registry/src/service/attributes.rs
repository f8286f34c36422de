//! Attribute assertions. Emitted as events only; nothing is stored here.

use crate::{action::Action, errors::*, traits::EventSink, types::*};
use erc1056_storage::Storage;

use super::{expiry, Authority, DidRegistryService};

impl<S, E> DidRegistryService<S, E>
where
    S: Storage + 'static,
    E: EventSink + 'static,
{
    pub(super) async fn set_attribute_internal(
        &self,
        ctx: &TxContext,
        identity: Address,
        authority: Authority<'_>,
        name: Bytes32,
        value: Vec<u8>,
        validity: u64,
    ) -> Result<LoggedEvent> {
        let action = Action::SetAttribute {
            name,
            value: value.clone(),
            validity,
        };
        let prior = self.authorize(ctx, identity, authority, &action).await?;

        if name.is_zero() {
            return Err(RegistryError::EmptyAttributeName);
        }
        let valid_to = expiry(ctx.timestamp, validity)?;

        let event = RegistryEvent::AttributeChanged {
            identity,
            name,
            value,
            valid_to,
            previous_change: prior,
        };
        self.commit_change(self.storage.batch(), ctx, event).await
    }

    /// Emit a zero-expiry event for the value; no existence check
    pub(super) async fn revoke_attribute_internal(
        &self,
        ctx: &TxContext,
        identity: Address,
        authority: Authority<'_>,
        name: Bytes32,
        value: Vec<u8>,
    ) -> Result<LoggedEvent> {
        let action = Action::RevokeAttribute {
            name,
            value: value.clone(),
        };
        let prior = self.authorize(ctx, identity, authority, &action).await?;

        let event = RegistryEvent::AttributeChanged {
            identity,
            name,
            value,
            valid_to: 0,
            previous_change: prior,
        };
        self.commit_change(self.storage.batch(), ctx, event).await
    }
}
