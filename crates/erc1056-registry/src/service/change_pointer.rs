//! Per-identity change pointer: history chain head and replay nonce.

use crate::{errors::*, traits::EventSink, types::*};
use erc1056_storage::{Batch, BatchExt, Storage, CF_CHANGED};
use tracing::info;

use super::DidRegistryService;

impl<S, E> DidRegistryService<S, E>
where
    S: Storage + 'static,
    E: EventSink + 'static,
{
    /// Stored pointer, zero when the identity never changed
    pub(super) async fn last_change_pointer_internal(
        &self,
        identity: Address,
    ) -> Result<ChangePointer> {
        let changed: Option<ChangePointer> = self.storage.get(CF_CHANGED, &identity).await?;
        Ok(changed.unwrap_or(ChangePointer::GENESIS))
    }

    /// Read the prior pointer before any write and check the host moves it forward
    pub(super) async fn begin_change(
        &self,
        ctx: &TxContext,
        identity: Address,
    ) -> Result<ChangePointer> {
        let prior = self.last_change_pointer_internal(identity).await?;
        if ctx.position <= prior {
            return Err(RegistryError::StaleLedgerPosition {
                position: ctx.position,
                changed: prior,
            });
        }
        Ok(prior)
    }

    /// Advance the pointer, stage the event and commit everything as one batch
    pub(super) async fn commit_change(
        &self,
        mut batch: Box<dyn Batch>,
        ctx: &TxContext,
        event: RegistryEvent,
    ) -> Result<LoggedEvent> {
        let identity = event.identity();
        batch.put(CF_CHANGED, &identity, &ctx.position)?;

        let logged = LoggedEvent {
            position: ctx.position,
            timestamp: ctx.timestamp,
            event,
        };

        if let Err(err) = self.events.append(batch.as_mut(), &logged) {
            batch.rollback();
            return Err(err);
        }

        batch.commit().await?;

        info!(
            identity = %identity,
            position = %logged.position,
            previous_change = %logged.event.previous_change(),
            event = logged.event.name(),
            "Registry change committed"
        );

        self.events.committed(&logged);
        Ok(logged)
    }
}
