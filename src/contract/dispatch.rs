//! Flash loan operations offered to the presentation layer.
//!
//! Raw form input (amount strings, addresses) is turned into an
//! [`Operation`] and dispatched against the flash loan contract of the
//! session's active network.

use serde_json::Value;
use std::sync::Arc;

use crate::chain::types::{Amount, TransactionOutcome};
use crate::contract::msg::{ConfigResponse, ExecuteRequest, QueryMsg};
use crate::network::{ContractName, NetworkId, NetworkRegistry};
use crate::wallet::{SessionError, SessionResult, SessionStatus, WalletSession};

/// One user action against the flash loan contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Execute(ExecuteRequest),
    Query(QueryMsg),
}

impl Operation {
    /// Provide `amount` (smallest unit) of the native denom as liquidity.
    pub fn provide(amount: &str) -> SessionResult<Self> {
        Ok(Self::Execute(ExecuteRequest::Provide {
            amount: parse_amount("amount", amount)?,
        }))
    }

    pub fn withdraw() -> Self {
        Self::Execute(ExecuteRequest::Withdraw)
    }

    pub fn loan(receiver: &str, amount: &str) -> SessionResult<Self> {
        Ok(Self::Execute(ExecuteRequest::Loan {
            receiver: require_text("receiver", receiver)?,
            amount: parse_amount("amount", amount)?,
        }))
    }

    pub fn query_config() -> Self {
        Self::Query(QueryMsg::GetConfig {})
    }

    pub fn query_provided(address: &str) -> SessionResult<Self> {
        Ok(Self::Query(QueryMsg::Provided {
            address: require_text("address", address)?,
        }))
    }

    pub fn query_balance() -> Self {
        Self::Query(QueryMsg::Balance {})
    }
}

/// Result of a dispatched [`Operation`].
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    Transaction(TransactionOutcome),
    Query(Value),
}

/// Flash loan client bound to a wallet session.
#[derive(Debug, Clone)]
pub struct FlashLoanClient {
    session: WalletSession,
    registry: Arc<NetworkRegistry>,
}

impl FlashLoanClient {
    pub fn new(session: WalletSession, registry: Arc<NetworkRegistry>) -> Self {
        Self { session, registry }
    }

    pub fn session(&self) -> &WalletSession {
        &self.session
    }

    /// Flash loan contract on the connected network.
    pub fn contract_address(&self) -> SessionResult<String> {
        self.target().map(|(_, address)| address)
    }

    /// Network and flash loan contract, taken from one status snapshot.
    fn target(&self) -> SessionResult<(NetworkId, String)> {
        let network = match self.session.status() {
            SessionStatus::Connected(info) => info.network,
            _ => return Err(SessionError::NotConnected),
        };
        let address = self
            .registry
            .contract_address(network, ContractName::FlashLoan)
            .ok_or(SessionError::ContractNotConfigured { network })?;
        Ok((network, address.to_string()))
    }

    /// Run `operation` against the flash loan contract.
    ///
    /// The session call is pinned to the network the contract address was
    /// resolved for; a reconnect in between yields `NetworkChanged`.
    pub async fn dispatch(&self, operation: Operation) -> SessionResult<OperationOutcome> {
        let (network, contract) = self.target()?;
        match operation {
            Operation::Execute(request) => self
                .session
                .execute_on(network, &contract, &request)
                .await
                .map(OperationOutcome::Transaction),
            Operation::Query(msg) => self
                .session
                .query_on(network, &contract, &msg)
                .await
                .map(OperationOutcome::Query),
        }
    }

    pub async fn provide(&self, amount: &str) -> SessionResult<TransactionOutcome> {
        self.transact(Operation::provide(amount)?).await
    }

    pub async fn withdraw(&self) -> SessionResult<TransactionOutcome> {
        self.transact(Operation::withdraw()).await
    }

    pub async fn request_loan(&self, receiver: &str, amount: &str) -> SessionResult<TransactionOutcome> {
        self.transact(Operation::loan(receiver, amount)?).await
    }

    /// Pool configuration, decoded.
    pub async fn query_config(&self) -> SessionResult<ConfigResponse> {
        let raw = self.ask(Operation::query_config()).await?;
        serde_json::from_value(raw)
            .map_err(|e| SessionError::QueryFailed(format!("Unexpected config response: {}", e)))
    }

    pub async fn query_provided(&self, address: &str) -> SessionResult<Value> {
        self.ask(Operation::query_provided(address)?).await
    }

    pub async fn query_balance(&self) -> SessionResult<Value> {
        self.ask(Operation::query_balance()).await
    }

    async fn transact(&self, operation: Operation) -> SessionResult<TransactionOutcome> {
        match self.dispatch(operation).await? {
            OperationOutcome::Transaction(outcome) => Ok(outcome),
            OperationOutcome::Query(_) => Err(SessionError::InvalidInput(
                "expected an execute operation".to_string(),
            )),
        }
    }

    async fn ask(&self, operation: Operation) -> SessionResult<Value> {
        match self.dispatch(operation).await? {
            OperationOutcome::Query(value) => Ok(value),
            OperationOutcome::Transaction(_) => Err(SessionError::InvalidInput(
                "expected a query operation".to_string(),
            )),
        }
    }
}

fn parse_amount(field: &str, raw: &str) -> SessionResult<Amount> {
    raw.parse()
        .map_err(|e| SessionError::InvalidInput(format!("{}: {}", field, e)))
}

fn require_text(field: &str, raw: &str) -> SessionResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(SessionError::InvalidInput(format!("{} is empty", field)));
    }
    Ok(value.to_string())
}
