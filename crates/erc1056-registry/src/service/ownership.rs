//! Controller reads and reassignment.

use crate::{action::Action, errors::*, traits::EventSink, types::*};
use erc1056_storage::{BatchExt, Storage, CF_OWNERS};

use super::{Authority, DidRegistryService};

impl<S, E> DidRegistryService<S, E>
where
    S: Storage + 'static,
    E: EventSink + 'static,
{
    pub(super) async fn current_controller_internal(&self, identity: Address) -> Result<Address> {
        let owner: Option<Address> = self.storage.get(CF_OWNERS, &identity).await?;
        Ok(owner.unwrap_or(identity))
    }

    pub(super) async fn change_owner_internal(
        &self,
        ctx: &TxContext,
        identity: Address,
        authority: Authority<'_>,
        new_owner: Address,
    ) -> Result<LoggedEvent> {
        let action = Action::ChangeOwner { new_owner };
        let prior = self.authorize(ctx, identity, authority, &action).await?;

        if new_owner.is_zero() {
            let message = match authority {
                Authority::Direct(_) => ZERO_OWNER,
                Authority::Signed(_) => ZERO_OWNER_SIGNED,
            };
            return Err(RegistryError::ZeroAddress(message));
        }

        let mut batch = self.storage.batch();
        batch.put(CF_OWNERS, &identity, &new_owner)?;

        let event = RegistryEvent::ControllerChanged {
            identity,
            owner: new_owner,
            previous_change: prior,
        };
        self.commit_change(batch, ctx, event).await
    }
}
