//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::network::GasPrice;

/// Errors that can occur while talking to a chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// RPC/REST connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Every endpoint exceeded the per-request timeout.
    #[error("REST timeout after {0} seconds on every endpoint")]
    Timeout(u64),

    /// The contract or the chain rejected the call.
    #[error("{0}")]
    Contract(String),

    /// Response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: String, actual: String },
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Errors produced when parsing an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount '{0}' is not a non-negative integer in the smallest unit")]
    NotAnInteger(String),

    #[error("amount '{0}' does not fit in 128 bits")]
    Overflow(String),
}

/// Non-negative integer amount in the smallest currency unit.
///
/// Kept as the digit string the user entered; the client never rescales it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(String);

impl Amount {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        if digits.is_empty() {
            return Err(AmountError::Empty);
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::NotAnInteger(digits.to_string()));
        }
        digits
            .parse::<u128>()
            .map_err(|_| AmountError::Overflow(digits.to_string()))?;
        Ok(Self(digits.to_string()))
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Funds attached to an execute call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: Amount,
}

impl Coin {
    pub fn new(amount: Amount, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Fee policy for submitted transactions.
///
/// `Auto` lets the signing client simulate the transaction and apply its own
/// gas multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeePolicy {
    #[default]
    Auto,
}

/// Options used when opening a signing client.
#[derive(Debug, Clone, PartialEq)]
pub struct SigningClientOptions {
    pub gas_price: GasPrice,
}

/// Result of a broadcast transaction included without a contract abort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub transaction_hash: String,
}
