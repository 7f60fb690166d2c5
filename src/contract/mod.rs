//! Flash loan contract interface.
//!
//! - msg.rs: JSON wire messages and the execute/funds pairing
//! - dispatch.rs: operation set used by the presentation layer

pub mod dispatch;
pub mod msg;

pub use dispatch::{FlashLoanClient, Operation, OperationOutcome};
pub use msg::{ConfigResponse, ExecuteMsg, ExecuteRequest, InstantiateMsg, LoanDenom, QueryMsg};
