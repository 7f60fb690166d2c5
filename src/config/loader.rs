//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{AppConfig, ContractAddresses};
use crate::config::validation::{validate_config, ValidationError};
use crate::network::NetworkId;

/// Overrides the default network.
pub const NETWORK_ENV_VAR: &str = "FLASH_LOAN_NETWORK";

/// Prefix for mainnet contract address variables.
pub const MAINNET_ENV_PREFIX: &str = "MAINNET_";

/// Contract address variables, without network prefix.
pub const CONTRACT_ENV_VARS: [&str; 3] = [
    "FLASH_LOAN_CONTRACT_ADDRESS",
    "SIMPLE_RECEIVER_CONTRACT_ADDRESS",
    "IBC_RECEIVER_CONTRACT_ADDRESS",
];

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load a TOML file, apply environment overrides and validate.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AppConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;
    finish(config)
}

/// Like [`load_config`], but starts from defaults when no file is given.
pub fn load_or_default(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => finish(AppConfig::default()),
    }
}

fn finish(mut config: AppConfig) -> Result<AppConfig, ConfigError> {
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply overrides found through `lookup` (normally the process environment).
///
/// Unprefixed contract variables fill the testnet table, `MAINNET_`-prefixed
/// ones the mainnet table. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(raw) = present(NETWORK_ENV_VAR) {
        match raw.parse::<NetworkId>() {
            Ok(network) => config.network = network,
            Err(e) => tracing::warn!(variable = NETWORK_ENV_VAR, error = %e, "Ignoring invalid network override"),
        }
    }

    for network in NetworkId::ALL {
        let prefix = match network {
            NetworkId::Testnet => "",
            NetworkId::Mainnet => MAINNET_ENV_PREFIX,
        };
        let table = config.contracts.for_network_mut(network);
        for var in CONTRACT_ENV_VARS {
            if let Some(address) = present(&format!("{}{}", prefix, var)) {
                *slot(table, var) = address.trim().to_string();
            }
        }
    }
}

fn slot<'a>(table: &'a mut ContractAddresses, var: &str) -> &'a mut String {
    match var {
        "SIMPLE_RECEIVER_CONTRACT_ADDRESS" => &mut table.simple_receiver,
        "IBC_RECEIVER_CONTRACT_ADDRESS" => &mut table.ibc_receiver,
        _ => &mut table.flash_loan,
    }
}
