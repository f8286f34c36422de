use anyhow::{Context, Result};
use erc1056_registry::Address;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Node configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_address: SocketAddr,

    /// Path to RocksDB database
    pub database_path: PathBuf,

    /// Registry identifier hashed into every signed payload
    pub registry_address: Address,

    /// Sender recorded for relayed transactions
    pub relayer_address: Address,

    /// Live event buffer per subscriber
    pub event_channel_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_address = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| "127.0.0.1:8545".to_string())
            .parse()
            .context("BIND_ADDRESS")?;

        let database_path = lookup("DATABASE_PATH")
            .unwrap_or_else(|| "./data/erc1056.db".to_string())
            .into();

        let registry_address = lookup("REGISTRY_ADDRESS")
            .unwrap_or_else(|| "0x1056000000000000000000000000000000001056".to_string())
            .parse()
            .context("REGISTRY_ADDRESS")?;

        let relayer_address = match lookup("RELAYER_ADDRESS") {
            Some(value) => value.parse().context("RELAYER_ADDRESS")?,
            None => Address::ZERO,
        };

        let event_channel_capacity: usize = lookup("EVENT_CHANNEL_CAPACITY")
            .unwrap_or_else(|| "1024".to_string())
            .parse()
            .context("EVENT_CHANNEL_CAPACITY")?;
        if event_channel_capacity == 0 {
            anyhow::bail!("EVENT_CHANNEL_CAPACITY must be greater than zero");
        }

        Ok(Config {
            bind_address,
            database_path,
            registry_address,
            relayer_address,
            event_channel_capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8545");
        assert_eq!(config.database_path, PathBuf::from("./data/erc1056.db"));
        assert_eq!(
            config.registry_address.to_string(),
            "0x1056000000000000000000000000000000001056"
        );
        assert_eq!(config.relayer_address, Address::ZERO);
        assert_eq!(config.event_channel_capacity, 1024);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("BIND_ADDRESS", "0.0.0.0:9000"),
            ("RELAYER_ADDRESS", "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            ("EVENT_CHANNEL_CAPACITY", "8"),
        ])
        .unwrap();
        assert_eq!(config.bind_address.port(), 9000);
        assert_eq!(config.relayer_address, Address([0xaa; 20]));
        assert_eq!(config.event_channel_capacity, 8);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(load(&[("REGISTRY_ADDRESS", "0x1234")]).is_err());
        assert!(load(&[("BIND_ADDRESS", "nowhere")]).is_err());
        assert!(load(&[("EVENT_CHANNEL_CAPACITY", "0")]).is_err());
    }
}
