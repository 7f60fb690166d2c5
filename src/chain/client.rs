//! Signing/broadcast client seam.
//!
//! # Responsibilities
//! - Open a signing client bound to an RPC endpoint and an offline signer
//! - Forward smart queries and contract executions to the chain
//!
//! The session never builds or signs transactions itself; sequence numbers,
//! gas simulation and broadcasting belong to the implementation behind
//! these traits.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::chain::types::{ChainResult, Coin, FeePolicy, SigningClientOptions, TransactionOutcome};
use crate::wallet::provider::OfflineSigner;

/// Opens signing clients (`connectWithSigner`).
#[async_trait]
pub trait ChainConnector: Send + Sync {
    /// Connect to `rpc_endpoint` and bind the client to `signer`.
    async fn connect_with_signer(
        &self,
        rpc_endpoint: &str,
        signer: Arc<dyn OfflineSigner>,
        options: SigningClientOptions,
    ) -> ChainResult<Arc<dyn SigningClient>>;
}

/// A connected client able to query contracts and submit signed executions.
#[async_trait]
pub trait SigningClient: Send + Sync {
    /// Run a read-only smart query and return the decoded JSON response.
    async fn query_contract_smart(&self, contract: &str, msg: &Value) -> ChainResult<Value>;

    /// Sign and broadcast a contract execution.
    async fn execute(
        &self,
        sender: &str,
        contract: &str,
        msg: &Value,
        fee: FeePolicy,
        memo: Option<&str>,
        funds: &[Coin],
    ) -> ChainResult<TransactionOutcome>;
}
