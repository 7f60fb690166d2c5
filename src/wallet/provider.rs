//! Wallet provider seam.
//!
//! The wallet extension (Keplr-style) is an injected capability: the host
//! passes an implementation of [`WalletProvider`] to the session, or `None`
//! when no extension is installed. Keys never leave the provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::network::{
    Bech32Config, Currency, FeeCurrency, GasPriceStep, NetworkProfile, COREUM_COIN_TYPE,
};

/// Failures reported by the wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The user declined the request.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Any other provider failure.
    #[error("{0}")]
    Failed(String),
}

/// An account exposed by an offline signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    /// Bech32 account address.
    pub address: String,
    /// Signing algorithm (e.g. `secp256k1`).
    pub algo: String,
    /// Compressed public key bytes.
    pub pubkey: Vec<u8>,
}

/// Emitted by the provider when the user switches or rotates keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeystoreEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bip44 {
    #[serde(rename = "coinType")]
    pub coin_type: u32,
}

/// Chain description handed to `experimentalSuggestChain`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSuggestion {
    pub chain_id: &'static str,
    pub chain_name: &'static str,
    pub rpc: &'static str,
    pub rest: &'static str,
    pub bip44: Bip44,
    pub bech32_config: Bech32Config,
    pub currencies: &'static [Currency],
    pub fee_currencies: &'static [FeeCurrency],
    pub stake_currency: Currency,
    pub coin_type: u32,
    pub gas_price_step: GasPriceStep,
}

impl ChainSuggestion {
    pub fn from_profile(profile: &NetworkProfile) -> Self {
        Self {
            chain_id: profile.chain_id,
            chain_name: profile.chain_name,
            rpc: profile.rpc,
            rest: profile.rest,
            bip44: Bip44 {
                coin_type: COREUM_COIN_TYPE,
            },
            bech32_config: profile.bech32_config,
            currencies: profile.currencies,
            fee_currencies: profile.fee_currencies,
            stake_currency: profile.stake_currency,
            coin_type: COREUM_COIN_TYPE,
            gas_price_step: profile.default_fee_currency().gas_price_step,
        }
    }
}

/// The injected wallet extension.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Register a chain with the wallet. May fail if it is already known.
    async fn experimental_suggest_chain(&self, chain: &ChainSuggestion) -> Result<(), ProviderError>;

    /// Ask the user to grant signing access for `chain_id`.
    async fn enable(&self, chain_id: &str) -> Result<(), ProviderError>;

    /// Signer for `chain_id`; only valid after [`WalletProvider::enable`].
    fn offline_signer(&self, chain_id: &str) -> Result<Arc<dyn OfflineSigner>, ProviderError>;

    /// Stream of keystore change notifications.
    fn subscribe_keystore_changes(&self) -> broadcast::Receiver<KeystoreEvent>;
}

/// A signer that keeps key material inside the wallet.
#[async_trait]
pub trait OfflineSigner: Send + Sync {
    /// Accounts the user exposed for this chain, in wallet order.
    async fn get_accounts(&self) -> Result<Vec<AccountData>, ProviderError>;

    /// Sign serialized `SignDoc` bytes for `signer_address` (direct sign mode).
    async fn sign_direct(&self, signer_address: &str, sign_doc: &[u8]) -> Result<Vec<u8>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{resolve, NetworkId};

    #[test]
    fn test_suggestion_wire_format() {
        let suggestion = ChainSuggestion::from_profile(resolve(NetworkId::Mainnet));
        let json = serde_json::to_value(&suggestion).unwrap();

        assert_eq!(json["chainId"], "coreum-mainnet-1");
        assert_eq!(json["chainName"], "Coreum");
        assert_eq!(json["bip44"]["coinType"], 990);
        assert_eq!(json["coinType"], 990);
        assert_eq!(json["bech32Config"]["bech32PrefixAccAddr"], "core");
        assert_eq!(json["bech32Config"]["bech32PrefixValAddr"], "corevaloper");
        assert_eq!(json["stakeCurrency"]["coinMinimalDenom"], "ucore");
        assert_eq!(json["feeCurrencies"][0]["coinDecimals"], 6);
        assert_eq!(json["gasPriceStep"]["high"], 0.25);
    }

    #[test]
    fn test_provider_error_display() {
        assert_eq!(
            ProviderError::Rejected("user closed popup".into()).to_string(),
            "Request rejected: user closed popup"
        );
        assert_eq!(ProviderError::Failed("boom".into()).to_string(), "boom");
    }
}
