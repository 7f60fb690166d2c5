//! Coreum flash loan client library.
//!
//! Wallet-session lifecycle and contract access for the CosmWasm flash loan
//! pool on Coreum testnet and mainnet.

pub mod chain;
pub mod config;
pub mod contract;
pub mod network;
pub mod observability;
pub mod wallet;

pub use config::AppConfig;
pub use contract::{FlashLoanClient, Operation, OperationOutcome};
pub use network::{NetworkId, NetworkRegistry};
pub use wallet::{SessionError, SessionResult, SessionStatus, WalletSession};
