//! Network parameter subsystem.
//!
//! # Data Flow
//! ```text
//! NetworkId (testnet | mainnet)
//!     → registry.rs (compiled-in NetworkProfile statics)
//!     → NetworkProfile (chain id, endpoints, prefixes, fee tiers)
//!
//! AppConfig.contracts
//!     → NetworkRegistry::contract_address (empty = not deployed)
//! ```

pub mod registry;
pub mod types;

pub use crate::config::schema::{ContractAddresses, ContractsConfig};
pub use registry::{resolve, ContractName, NetworkRegistry, COREUM_COIN_TYPE};
pub use types::{Bech32Config, Currency, FeeCurrency, GasPrice, GasPriceStep, NetworkId, NetworkProfile};
