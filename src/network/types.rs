//! Chain parameter types.
//!
//! Field names serialize in the camelCase form wallet extensions expect when
//! a chain is suggested to them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two supported chain environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    #[default]
    Testnet,
    Mainnet,
}

impl NetworkId {
    /// Every supported network, in display order.
    pub const ALL: [NetworkId; 2] = [NetworkId::Testnet, NetworkId::Mainnet];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkId::Testnet => "testnet",
            NetworkId::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" | "test" => Ok(NetworkId::Testnet),
            "mainnet" | "main" => Ok(NetworkId::Mainnet),
            other => Err(format!("unknown network '{}'", other)),
        }
    }
}

/// A denomination descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    /// Display symbol (e.g. `CORE`).
    pub coin_denom: &'static str,
    /// Smallest on-chain unit (e.g. `ucore`).
    pub coin_minimal_denom: &'static str,
    /// Decimal exponent between display and minimal units.
    pub coin_decimals: u8,
}

/// Three-point gas price tier, in minimal units per gas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GasPriceStep {
    pub low: f64,
    pub average: f64,
    pub high: f64,
}

/// A currency accepted for fees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeCurrency {
    #[serde(flatten)]
    pub currency: Currency,
    pub gas_price_step: GasPriceStep,
}

/// The six bech32 human-readable prefixes of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bech32Config {
    pub bech32_prefix_acc_addr: &'static str,
    pub bech32_prefix_acc_pub: &'static str,
    pub bech32_prefix_val_addr: &'static str,
    pub bech32_prefix_val_pub: &'static str,
    pub bech32_prefix_cons_addr: &'static str,
    pub bech32_prefix_cons_pub: &'static str,
}

/// Gas price handed to the signing client (`0.1ucore`).
#[derive(Debug, Clone, PartialEq)]
pub struct GasPrice {
    pub amount: f64,
    pub denom: String,
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Everything needed to talk to one chain environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkProfile {
    pub id: NetworkId,
    pub chain_id: &'static str,
    pub chain_name: &'static str,
    pub rpc: &'static str,
    pub rest: &'static str,
    pub stake_currency: Currency,
    pub bech32_config: Bech32Config,
    pub currencies: &'static [Currency],
    /// Never empty; the first entry is the default fee currency.
    pub fee_currencies: &'static [FeeCurrency],
}

impl NetworkProfile {
    /// The fee currency used for the default gas price.
    pub fn default_fee_currency(&self) -> &FeeCurrency {
        &self.fee_currencies[0]
    }

    /// Average gas tier of the default fee currency.
    pub fn default_gas_price(&self) -> GasPrice {
        let fee = self.default_fee_currency();
        GasPrice {
            amount: fee.gas_price_step.average,
            denom: fee.currency.coin_minimal_denom.to_string(),
        }
    }

    /// Minimal denom attached as funds when providing liquidity.
    pub fn native_denom(&self) -> &'static str {
        self.stake_currency.coin_minimal_denom
    }

    /// Account address prefix (`core`, `testcore`).
    pub fn account_prefix(&self) -> &'static str {
        self.bech32_config.bech32_prefix_acc_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_id_parse() {
        assert_eq!("testnet".parse::<NetworkId>().unwrap(), NetworkId::Testnet);
        assert_eq!("MAIN".parse::<NetworkId>().unwrap(), NetworkId::Mainnet);
        assert!("devnet".parse::<NetworkId>().is_err());
    }

    #[test]
    fn test_network_id_serde() {
        assert_eq!(serde_json::to_string(&NetworkId::Mainnet).unwrap(), "\"mainnet\"");
        let id: NetworkId = serde_json::from_str("\"testnet\"").unwrap();
        assert_eq!(id, NetworkId::Testnet);
        assert_eq!(NetworkId::default(), NetworkId::Testnet);
    }

    #[test]
    fn test_gas_price_display() {
        let price = GasPrice {
            amount: 0.1,
            denom: "ucore".to_string(),
        };
        assert_eq!(price.to_string(), "0.1ucore");
    }

    #[test]
    fn test_fee_currency_flattens() {
        let fee = FeeCurrency {
            currency: Currency {
                coin_denom: "CORE",
                coin_minimal_denom: "ucore",
                coin_decimals: 6,
            },
            gas_price_step: GasPriceStep {
                low: 0.0625,
                average: 0.1,
                high: 0.25,
            },
        };
        let json = serde_json::to_value(fee).unwrap();
        assert_eq!(json["coinMinimalDenom"], "ucore");
        assert_eq!(json["gasPriceStep"]["average"], 0.1);
    }
}
