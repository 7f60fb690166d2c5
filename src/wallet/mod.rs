//! Wallet session subsystem.
//!
//! # Data Flow
//! ```text
//! connect(network)
//!     → provider.rs (suggest chain, enable, offline signer, accounts)
//!     → chain::client (open signing client with the average gas price)
//!     → session.rs (Connected; events.rs watches for keystore changes)
//!
//! query / execute
//!     → session.rs (connected guard, contract guard)
//!     → chain::client (smart query / signed execute)
//! ```
//!
//! # Security Constraints
//! - Key material stays inside the wallet provider
//! - A keystore change ends the session; the user must reconnect

pub mod error;
pub mod events;
pub mod provider;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use events::{KeystoreNotifier, KeystoreWatch};
pub use provider::{AccountData, ChainSuggestion, KeystoreEvent, OfflineSigner, ProviderError, WalletProvider};
pub use session::{SessionInfo, SessionStatus, WalletSession};
