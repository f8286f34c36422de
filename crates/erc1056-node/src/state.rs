use anyhow::Result;
use erc1056_ledger::{LocalLedger, SystemClock};
use erc1056_storage::RocksDbStorage;
use std::sync::Arc;

use crate::config::Config;

pub type NodeLedger = LocalLedger<RocksDbStorage, SystemClock>;

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub ledger: NodeLedger,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let storage = Arc::new(RocksDbStorage::open(&config.database_path)?);

        let ledger = LocalLedger::open(
            storage,
            Arc::new(SystemClock),
            config.registry_address,
            config.event_channel_capacity,
        )
        .await?;

        tracing::info!(
            registry = %config.registry_address,
            height = ledger.height().await,
            "Ledger ready"
        );

        Ok(AppState { config, ledger })
    }
}
