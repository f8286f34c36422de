//! Event journal: canonical event log, attribute index and live feed.
//!
//! Events are keyed `(identity, position)` in [`CF_EVENT_LOG`]. Each event's
//! `previous_change` names the key of the identity's prior event, so an
//! identity's history is a walk from its change pointer down to zero.

use crate::errors::*;
use erc1056_crypto::keccak256;
use erc1056_registry::{
    Address, Bytes32, ChangePointer, EventSink, LoggedEvent, RegistryEvent,
};
use erc1056_storage::{
    Batch, BatchExt, Storage, CF_ATTRIBUTE_INDEX, CF_CHANGED, CF_EVENT_LOG,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Latest known state of one (identity, name, value) attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub name: Bytes32,
    #[serde(with = "erc1056_registry::types::hex_bytes")]
    pub value: Vec<u8>,
    /// Zero once revoked
    pub valid_to: u64,
    /// Position of the event that produced this record
    pub position: ChangePointer,
}

impl AttributeRecord {
    pub fn is_active(&self, now: u64) -> bool {
        self.valid_to > now
    }
}

/// Registry event sink backed by a [`Storage`]
pub struct EventJournal<S: Storage> {
    storage: Arc<S>,
    sender: broadcast::Sender<LoggedEvent>,
}

impl<S: Storage> EventJournal<S> {
    /// Create a journal whose live feed buffers `capacity` events per subscriber
    pub fn new(storage: Arc<S>, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { storage, sender }
    }

    /// Subscribe to events as they commit
    pub fn subscribe(&self) -> broadcast::Receiver<LoggedEvent> {
        self.sender.subscribe()
    }

    /// Event recorded for `identity` at `position`
    pub async fn event_at(
        &self,
        identity: Address,
        position: ChangePointer,
    ) -> Result<Option<LoggedEvent>> {
        Ok(self
            .storage
            .get(CF_EVENT_LOG, &(identity, position))
            .await?)
    }

    /// Every event of `identity`, newest first
    pub async fn history(&self, identity: Address) -> Result<Vec<LoggedEvent>> {
        let head: Option<ChangePointer> = self.storage.get(CF_CHANGED, &identity).await?;
        let mut position = head.unwrap_or(ChangePointer::GENESIS);
        let mut events = Vec::new();

        while !position.is_genesis() {
            let logged = self
                .event_at(identity, position)
                .await?
                .ok_or(LedgerError::BrokenHistory { identity, position })?;
            position = logged.event.previous_change();
            events.push(logged);
        }

        Ok(events)
    }

    /// Indexed attributes of `identity`, revoked and expired ones included
    pub async fn attributes(&self, identity: Address) -> Result<Vec<AttributeRecord>> {
        let entries: Vec<(Vec<u8>, AttributeRecord)> = self
            .storage
            .get_by_prefix(CF_ATTRIBUTE_INDEX, &identity)
            .await?;
        Ok(entries.into_iter().map(|(_, record)| record).collect())
    }

    /// Indexed attributes of `identity` still valid at `now`
    pub async fn active_attributes(
        &self,
        identity: Address,
        now: u64,
    ) -> Result<Vec<AttributeRecord>> {
        let mut records = self.attributes(identity).await?;
        records.retain(|record| record.is_active(now));
        Ok(records)
    }

    /// Recompute the attribute index of `identity` from its event chain
    ///
    /// Returns the number of records written.
    pub async fn rebuild_attribute_index(&self, identity: Address) -> Result<usize> {
        let history = self.history(identity).await?;
        let existing: Vec<(Vec<u8>, AttributeRecord)> = self
            .storage
            .get_by_prefix(CF_ATTRIBUTE_INDEX, &identity)
            .await?;

        let mut batch = self.storage.batch();
        for (key, _) in existing {
            batch.delete_raw(CF_ATTRIBUTE_INDEX, key)?;
        }

        let mut latest = std::collections::BTreeMap::new();
        for logged in history.iter().rev() {
            if let Some((key, record)) = attribute_entry(logged) {
                latest.insert(key, record);
            }
        }
        for (key, record) in &latest {
            batch.put(CF_ATTRIBUTE_INDEX, key, record)?;
        }
        batch.commit().await?;

        debug!(
            identity = %identity,
            records = latest.len(),
            "Rebuilt attribute index"
        );
        Ok(latest.len())
    }
}

type AttributeKey = (Address, Bytes32, [u8; 32]);

fn attribute_entry(logged: &LoggedEvent) -> Option<(AttributeKey, AttributeRecord)> {
    match &logged.event {
        RegistryEvent::AttributeChanged {
            identity,
            name,
            value,
            valid_to,
            ..
        } => Some((
            (*identity, *name, keccak256(value)),
            AttributeRecord {
                name: *name,
                value: value.clone(),
                valid_to: *valid_to,
                position: logged.position,
            },
        )),
        _ => None,
    }
}

impl<S: Storage> EventSink for EventJournal<S> {
    fn append(&self, batch: &mut dyn Batch, event: &LoggedEvent) -> erc1056_registry::Result<()> {
        let identity = event.event.identity();
        batch.put(CF_EVENT_LOG, &(identity, event.position), event)?;

        if let Some((key, record)) = attribute_entry(event) {
            batch.put(CF_ATTRIBUTE_INDEX, &key, &record)?;
        }
        Ok(())
    }

    fn committed(&self, event: &LoggedEvent) {
        // No subscribers is not an error
        if self.sender.send(event.clone()).is_err() {
            debug!(position = %event.position, "No event subscribers");
        }
    }
}
