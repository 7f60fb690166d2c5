//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Contract addresses decode as bech32 with their network's account prefix
//! - Value ranges and URL shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use bech32::primitives::decode::CheckedHrpstring;
use bech32::Bech32;
use url::Url;

use crate::config::schema::AppConfig;
use crate::network::{resolve, ContractName, NetworkId, NetworkRegistry};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let registry = NetworkRegistry::new(config.contracts.clone());

    for network in NetworkId::ALL {
        let prefix = resolve(network).account_prefix();
        for name in ContractName::ALL {
            if let Some(address) = registry.contract_address(network, name) {
                if let Err(message) = check_address(address, prefix) {
                    errors.push(ValidationError::new(
                        format!("contracts.{}.{}", network, field_name(name)),
                        message,
                    ));
                }
            }
        }

        for url in config.lcd.failover_urls(network) {
            let valid = Url::parse(url)
                .map(|u| matches!(u.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !valid {
                errors.push(ValidationError::new(
                    format!("lcd.{}_failover_urls", network),
                    format!("'{}' is not an http(s) URL", url),
                ));
            }
        }
    }

    if config.lcd.timeout_secs == 0 {
        errors.push(ValidationError::new("lcd.timeout_secs", "must be greater than zero"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("'{}' is not one of {}", config.observability.log_level, LOG_LEVELS.join(", ")),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn field_name(name: ContractName) -> &'static str {
    match name {
        ContractName::FlashLoan => "flash_loan",
        ContractName::SimpleReceiver => "simple_receiver",
        ContractName::IbcReceiver => "ibc_receiver",
    }
}

/// Decode `address` as a bech32 account address whose human-readable part is `prefix`.
fn check_address(address: &str, prefix: &str) -> Result<(), String> {
    if address.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(format!("'{}' must be lowercase", address));
    }

    let checked = CheckedHrpstring::new::<Bech32>(address)
        .map_err(|e| format!("'{}' is not a bech32 address: {}", address, e))?;

    let hrp = checked.hrp();
    if hrp.as_str() != prefix {
        return Err(format!(
            "'{}' has prefix '{}', expected '{}'",
            address,
            hrp.as_str(),
            prefix
        ));
    }
    if checked.byte_iter().next().is_none() {
        return Err(format!("'{}' carries no account bytes", address));
    }
    Ok(())
}
