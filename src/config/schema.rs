//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::network::NetworkId;

/// Root configuration for the flash-loan client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Network used when none is selected explicitly.
    pub network: NetworkId,

    /// Deployed contract addresses per network.
    pub contracts: ContractsConfig,

    /// REST (LCD) query settings.
    pub lcd: LcdConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Contract address tables for both networks.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ContractsConfig {
    pub testnet: ContractAddresses,
    pub mainnet: ContractAddresses,
}

impl ContractsConfig {
    /// Address table for one network.
    pub fn for_network(&self, network: NetworkId) -> &ContractAddresses {
        match network {
            NetworkId::Testnet => &self.testnet,
            NetworkId::Mainnet => &self.mainnet,
        }
    }

    /// Mutable address table for one network.
    pub fn for_network_mut(&mut self, network: NetworkId) -> &mut ContractAddresses {
        match network {
            NetworkId::Testnet => &mut self.testnet,
            NetworkId::Mainnet => &mut self.mainnet,
        }
    }
}

/// Named contract addresses on one network.
///
/// An empty string means the contract is not deployed there.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ContractAddresses {
    /// The flash loan pool contract.
    pub flash_loan: String,

    /// Reference receiver that repays loans in the same transaction.
    pub simple_receiver: String,

    /// Receiver that forwards borrowed funds over IBC.
    pub ibc_receiver: String,
}

/// REST endpoint settings used for wallet-less queries.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LcdConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Extra testnet REST endpoints tried after the built-in one.
    pub testnet_failover_urls: Vec<String>,

    /// Extra mainnet REST endpoints tried after the built-in one.
    pub mainnet_failover_urls: Vec<String>,
}

impl LcdConfig {
    pub fn failover_urls(&self, network: NetworkId) -> &[String] {
        match network {
            NetworkId::Testnet => &self.testnet_failover_urls,
            NetworkId::Mainnet => &self.mainnet_failover_urls,
        }
    }
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            testnet_failover_urls: Vec::new(),
            mainnet_failover_urls: Vec::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.network, NetworkId::Testnet);
        assert!(config.contracts.testnet.flash_loan.is_empty());
        assert_eq!(config.lcd.timeout_secs, 10);
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.observability.json_logs);
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            network = "mainnet"

            [contracts.mainnet]
            flash_loan = "core1pool"
            "#,
        )
        .unwrap();

        assert_eq!(config.network, NetworkId::Mainnet);
        assert_eq!(config.contracts.mainnet.flash_loan, "core1pool");
        assert!(config.contracts.mainnet.simple_receiver.is_empty());
        assert!(config.contracts.testnet.flash_loan.is_empty());
        assert_eq!(config.lcd.timeout_secs, 10);
    }

    #[test]
    fn test_for_network() {
        let mut contracts = ContractsConfig::default();
        contracts.for_network_mut(NetworkId::Mainnet).ibc_receiver = "core1ibc".into();
        assert_eq!(contracts.for_network(NetworkId::Mainnet).ibc_receiver, "core1ibc");
        assert!(contracts.for_network(NetworkId::Testnet).ibc_receiver.is_empty());
    }
}
