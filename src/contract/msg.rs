//! Flash loan contract wire messages.
//!
//! Every message is a JSON object tagged by a single top-level key, e.g.
//! `{"loan": {"receiver": "...", "amount": "500"}}`.

use serde::{Deserialize, Serialize};

use crate::chain::types::{Amount, Coin};

/// Instantiate message of the flash loan contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantiateMsg {
    pub admin: Option<String>,
    pub fee: String,
    pub loan_denom: LoanDenom,
}

impl InstantiateMsg {
    /// `denom` is a cw20 contract when it is an address on the network
    /// with account prefix `account_prefix`, a native denom otherwise.
    pub fn new(admin: Option<String>, fee: &str, denom: &str, account_prefix: &str) -> Self {
        let is_contract = denom
            .strip_prefix(account_prefix)
            .is_some_and(|rest| rest.starts_with('1'));
        let loan_denom = if is_contract {
            LoanDenom::Cw20 {
                address: denom.to_string(),
            }
        } else {
            LoanDenom::Native {
                denom: denom.to_string(),
            }
        };
        Self {
            admin,
            fee: fee.to_string(),
            loan_denom,
        }
    }
}

/// Execute messages accepted by the flash loan contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Deposit the attached funds as liquidity.
    Provide {},
    /// Withdraw the sender's liquidity plus earned fees.
    Withdraw {},
    /// Lend `amount` to `receiver`, which must repay within the same transaction.
    Loan { receiver: String, amount: Amount },
}

/// Query messages accepted by the flash loan contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    GetConfig {},
    Provided { address: String },
    Balance {},
}

/// Response to [`QueryMsg::GetConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub admin: Option<String>,
    /// Fee ratio as a decimal string (e.g. `"0.003"`).
    pub fee: String,
    pub loan_denom: LoanDenom,
}

impl ConfigResponse {
    /// Native denom or cw20 address, whichever the pool lends.
    pub fn loan_denom_label(&self) -> &str {
        match &self.loan_denom {
            LoanDenom::Native { denom } => denom,
            LoanDenom::Cw20 { address } => address,
        }
    }
}

/// Asset lent by the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanDenom {
    Native { denom: String },
    Cw20 { address: String },
}

/// A state-changing call together with the funds it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteRequest {
    /// Attaches one coin of the network's native denom.
    Provide { amount: Amount },
    Withdraw,
    /// The loan amount is contract accounting; no funds are attached.
    Loan { receiver: String, amount: Amount },
}

impl ExecuteRequest {
    /// Short name used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ExecuteRequest::Provide { .. } => "provide",
            ExecuteRequest::Withdraw => "withdraw",
            ExecuteRequest::Loan { .. } => "loan",
        }
    }

    /// Wire message sent to the contract.
    pub fn message(&self) -> ExecuteMsg {
        match self {
            ExecuteRequest::Provide { .. } => ExecuteMsg::Provide {},
            ExecuteRequest::Withdraw => ExecuteMsg::Withdraw {},
            ExecuteRequest::Loan { receiver, amount } => ExecuteMsg::Loan {
                receiver: receiver.clone(),
                amount: amount.clone(),
            },
        }
    }

    /// Funds to attach, given the active network's native denom.
    pub fn funds(&self, native_denom: &str) -> Vec<Coin> {
        match self {
            ExecuteRequest::Provide { amount } => vec![Coin::new(amount.clone(), native_denom)],
            ExecuteRequest::Withdraw | ExecuteRequest::Loan { .. } => Vec::new(),
        }
    }
}
