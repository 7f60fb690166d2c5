//! Chain access subsystem.
//!
//! # Data Flow
//! ```text
//! WalletSession
//!     → client.rs (ChainConnector opens a SigningClient over RPC)
//!     → SigningClient (smart queries, signed executes)
//!
//! Operator CLI
//!     → lcd.rs (read-only smart queries over REST, with failover)
//! ```
//!
//! # Constraints
//! - Signing happens only inside the wallet; no key material in-process
//! - All REST calls have configurable timeouts
//! - Fees use the client's automatic estimation

pub mod client;
pub mod lcd;
pub mod types;

pub use client::{ChainConnector, SigningClient};
pub use lcd::LcdClient;
pub use types::{
    Amount, AmountError, ChainError, ChainResult, Coin, FeePolicy, SigningClientOptions,
    TransactionOutcome,
};
