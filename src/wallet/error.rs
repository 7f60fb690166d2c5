//! Session error taxonomy.

use thiserror::Error;

use crate::network::NetworkId;

/// Errors surfaced by the wallet session and the operation dispatcher.
///
/// `Display` is the human-readable message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No wallet extension is installed.
    #[error("Please install Keplr wallet extension")]
    WalletNotAvailable,

    /// The user declined access or account disclosure.
    #[error("Wallet authorization denied: {0}")]
    WalletAuthorizationDenied(String),

    /// The wallet failed for a reason other than a user rejection.
    #[error("Wallet provider error: {0}")]
    WalletProvider(String),

    /// The RPC endpoint could not be reached.
    #[error("Chain connection error: {0}")]
    ChainConnection(String),

    #[error("Wallet not connected")]
    NotConnected,

    /// A `connect` call is already running.
    #[error("Connection already in progress")]
    ConnectionInProgress,

    /// `disconnect` ran while this `connect` was in flight.
    #[error("Connection attempt aborted by disconnect")]
    ConnectAborted,

    /// The session reconnected to another network while an operation was prepared.
    #[error("Session moved from {expected} to {actual}; retry the operation")]
    NetworkChanged { expected: NetworkId, actual: NetworkId },

    #[error("Contract address not configured for {network}")]
    ContractNotConfigured { network: NetworkId },

    /// Presentation-layer input was empty or not a smallest-unit integer.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SessionError::ContractNotConfigured {
            network: NetworkId::Mainnet,
        };
        assert_eq!(err.to_string(), "Contract address not configured for mainnet");

        let err = SessionError::NetworkChanged {
            expected: NetworkId::Testnet,
            actual: NetworkId::Mainnet,
        };
        assert_eq!(err.to_string(), "Session moved from testnet to mainnet; retry the operation");

        let err = SessionError::TransactionFailed("insufficient funds".into());
        assert!(err.to_string().contains("insufficient funds"));
    }
}
