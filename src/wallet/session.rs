//! Wallet session lifecycle and contract call mediation.
//!
//! # State Machine
//! ```text
//!  Disconnected ──connect──▶ Connecting ──ok──▶ Connected
//!       ▲                        │                  │
//!       └────── error/abort ─────┘                  │
//!       └──────── disconnect / keystore change ─────┘
//! ```
//!
//! The state lock is only held for snapshots and transitions, never across
//! an await. Queries and executes clone the client handle out of the
//! `Connected` state, so a disconnect never blocks on in-flight I/O.

use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::chain::client::{ChainConnector, SigningClient};
use crate::chain::types::{FeePolicy, SigningClientOptions, TransactionOutcome};
use crate::contract::msg::{ExecuteRequest, QueryMsg};
use crate::network::{resolve, NetworkId, NetworkProfile};
use crate::observability::metrics;
use crate::wallet::error::{SessionError, SessionResult};
use crate::wallet::events::KeystoreWatch;
use crate::wallet::provider::{ChainSuggestion, ProviderError, WalletProvider};

/// Public view of a connected session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    /// Correlation ID carried by every log line of this session.
    pub session_id: Uuid,
    pub address: String,
    pub network: NetworkId,
    pub chain_id: &'static str,
}

/// Snapshot of the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Disconnected,
    Connecting { network: NetworkId },
    Connected(SessionInfo),
}

enum SessionState {
    Disconnected,
    Connecting { attempt: Uuid, network: NetworkId },
    Connected(ActiveSession),
}

struct ActiveSession {
    id: Uuid,
    address: String,
    network: NetworkId,
    client: Arc<dyn SigningClient>,
    /// Cancelled when the session is dropped.
    _keystore_watch: KeystoreWatch,
}

impl ActiveSession {
    fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.id,
            address: self.address.clone(),
            network: self.network,
            chain_id: resolve(self.network).chain_id,
        }
    }
}

/// What an operation needs from a connected session.
struct Connection {
    id: Uuid,
    address: String,
    network: NetworkId,
    client: Arc<dyn SigningClient>,
}

struct Inner {
    provider: Option<Arc<dyn WalletProvider>>,
    connector: Arc<dyn ChainConnector>,
    state: Mutex<SessionState>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the connected session, optionally pinned to `expected`.
    fn connection(&self, expected: Option<NetworkId>) -> SessionResult<Connection> {
        let state = self.lock();
        let SessionState::Connected(active) = &*state else {
            return Err(SessionError::NotConnected);
        };
        if let Some(expected) = expected.filter(|network| *network != active.network) {
            return Err(SessionError::NetworkChanged {
                expected,
                actual: active.network,
            });
        }
        Ok(Connection {
            id: active.id,
            address: active.address.clone(),
            network: active.network,
            client: active.client.clone(),
        })
    }

    /// Drop back to `Disconnected` if `attempt` is still the one connecting.
    fn abandon(&self, attempt: Uuid) {
        let mut state = self.lock();
        if matches!(&*state, SessionState::Connecting { attempt: current, .. } if *current == attempt) {
            *state = SessionState::Disconnected;
            metrics::record_session_transition("disconnected");
        }
    }

    /// End session `id` if it is still the active one.
    fn end_session(&self, id: Uuid) -> bool {
        let ended = {
            let mut state = self.lock();
            let current = matches!(&*state, SessionState::Connected(active) if active.id == id);
            current.then(|| std::mem::replace(&mut *state, SessionState::Disconnected))
        };
        if ended.is_some() {
            metrics::record_session_transition("disconnected");
        }
        ended.is_some()
    }
}

/// An in-flight `connect`. Dropping it unfinished resets the session.
struct ConnectAttempt {
    inner: Arc<Inner>,
    id: Uuid,
    network: NetworkId,
    armed: bool,
}

impl ConnectAttempt {
    fn begin(inner: &Arc<Inner>, network: NetworkId) -> SessionResult<Self> {
        let id = Uuid::new_v4();
        let previous = {
            let mut state = inner.lock();
            if let SessionState::Connecting { .. } = &*state {
                return Err(SessionError::ConnectionInProgress);
            }
            std::mem::replace(&mut *state, SessionState::Connecting { attempt: id, network })
        };

        if let SessionState::Connected(old) = previous {
            tracing::info!(
                session_id = %old.id,
                network = %old.network,
                "Releasing previous session before reconnecting"
            );
        }
        metrics::record_session_transition("connecting");

        Ok(Self {
            inner: inner.clone(),
            id,
            network,
            armed: true,
        })
    }

    /// Install the connected session unless a disconnect got there first.
    fn complete(
        mut self,
        provider: &dyn WalletProvider,
        address: String,
        client: Arc<dyn SigningClient>,
    ) -> SessionResult<SessionInfo> {
        let id = self.id;
        let mut state = self.inner.lock();
        let current = matches!(&*state, SessionState::Connecting { attempt, .. } if *attempt == id);
        if !current {
            drop(state);
            self.armed = false;
            tracing::info!(session_id = %id, "Connection attempt superseded by disconnect");
            return Err(SessionError::ConnectAborted);
        }

        let weak = Arc::downgrade(&self.inner);
        let keystore_watch = KeystoreWatch::spawn(provider.subscribe_keystore_changes(), move || {
            if let Some(inner) = weak.upgrade() {
                if inner.end_session(id) {
                    tracing::info!(session_id = %id, "Wallet keystore changed, session disconnected");
                }
            }
        });

        let active = ActiveSession {
            id,
            address,
            network: self.network,
            client,
            _keystore_watch: keystore_watch,
        };
        let info = active.info();
        *state = SessionState::Connected(active);
        drop(state);
        self.armed = false;

        metrics::record_session_transition("connected");
        tracing::info!(
            session_id = %id,
            address = %info.address,
            network = %info.network,
            chain_id = info.chain_id,
            "Wallet connected"
        );
        Ok(info)
    }
}

impl Drop for ConnectAttempt {
    fn drop(&mut self) {
        if self.armed {
            self.inner.abandon(self.id);
        }
    }
}

/// The wallet session shared by the presentation layer.
///
/// Cheap to clone; clones share one state.
#[derive(Clone)]
pub struct WalletSession {
    inner: Arc<Inner>,
}

impl WalletSession {
    /// Create a disconnected session.
    ///
    /// `provider` is `None` when no wallet extension is installed.
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, connector: Arc<dyn ChainConnector>) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                connector,
                state: Mutex::new(SessionState::Disconnected),
            }),
        }
    }

    pub fn status(&self) -> SessionStatus {
        match &*self.inner.lock() {
            SessionState::Disconnected => SessionStatus::Disconnected,
            SessionState::Connecting { network, .. } => SessionStatus::Connecting { network: *network },
            SessionState::Connected(active) => SessionStatus::Connected(active.info()),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(&*self.inner.lock(), SessionState::Connected(_))
    }

    /// Connected account address.
    pub fn address(&self) -> Option<String> {
        match &*self.inner.lock() {
            SessionState::Connected(active) => Some(active.address.clone()),
            _ => None,
        }
    }

    /// Active network; the default network while disconnected.
    pub fn network(&self) -> NetworkId {
        match &*self.inner.lock() {
            SessionState::Disconnected => NetworkId::default(),
            SessionState::Connecting { network, .. } => *network,
            SessionState::Connected(active) => active.network,
        }
    }

    /// Connect the wallet to `network`.
    ///
    /// Any failure after the chain suggestion leaves the session disconnected.
    pub async fn connect(&self, network: NetworkId) -> SessionResult<SessionInfo> {
        let profile = resolve(network);
        let Some(provider) = self.inner.provider.clone() else {
            tracing::warn!(network = %network, "No wallet provider available");
            return Err(SessionError::WalletNotAvailable);
        };

        let attempt = ConnectAttempt::begin(&self.inner, network)?;
        tracing::info!(
            session_id = %attempt.id,
            network = %network,
            chain_id = profile.chain_id,
            "Connecting wallet"
        );

        match self.establish(provider.as_ref(), profile).await {
            Ok((address, client)) => attempt.complete(provider.as_ref(), address, client),
            Err(e) => {
                tracing::warn!(session_id = %attempt.id, error = %e, "Wallet connection failed");
                Err(e)
            }
        }
    }

    async fn establish(
        &self,
        provider: &dyn WalletProvider,
        profile: &'static NetworkProfile,
    ) -> SessionResult<(String, Arc<dyn SigningClient>)> {
        suggest_chain(provider, profile).await;

        provider.enable(profile.chain_id).await.map_err(provider_error)?;
        let signer = provider.offline_signer(profile.chain_id).map_err(provider_error)?;
        let accounts = signer.get_accounts().await.map_err(provider_error)?;
        let address = accounts
            .into_iter()
            .next()
            .map(|account| account.address)
            .ok_or_else(|| SessionError::WalletProvider("Wallet returned no accounts".to_string()))?;

        let options = SigningClientOptions {
            gas_price: profile.default_gas_price(),
        };
        let client = self
            .inner
            .connector
            .connect_with_signer(profile.rpc, signer, options)
            .await
            .map_err(|e| SessionError::ChainConnection(e.to_string()))?;

        Ok((address, client))
    }

    /// Reset to the empty disconnected state. Idempotent.
    pub fn disconnect(&self) {
        let previous = std::mem::replace(&mut *self.inner.lock(), SessionState::Disconnected);
        match previous {
            SessionState::Connected(active) => {
                metrics::record_session_transition("disconnected");
                tracing::info!(session_id = %active.id, address = %active.address, "Wallet disconnected");
            }
            SessionState::Connecting { attempt, .. } => {
                metrics::record_session_transition("disconnected");
                tracing::info!(session_id = %attempt, "Connection attempt cancelled");
            }
            SessionState::Disconnected => {}
        }
    }

    /// Run a smart query against `contract` and return the JSON response verbatim.
    pub async fn query(&self, contract: &str, msg: &QueryMsg) -> SessionResult<Value> {
        let conn = self.inner.connection(None)?;
        self.run_query(conn, contract, msg).await
    }

    /// Like [`query`](Self::query), but fails with `NetworkChanged` unless
    /// the session is still connected to `network`.
    pub async fn query_on(&self, network: NetworkId, contract: &str, msg: &QueryMsg) -> SessionResult<Value> {
        let conn = self.inner.connection(Some(network))?;
        self.run_query(conn, contract, msg).await
    }

    /// Sign and broadcast an execute against `contract`.
    ///
    /// Funds are derived from the request and the active network; the fee
    /// uses the client's automatic estimation. No retry is attempted.
    pub async fn execute(&self, contract: &str, request: &ExecuteRequest) -> SessionResult<TransactionOutcome> {
        let conn = self.inner.connection(None)?;
        self.run_execute(conn, contract, request).await
    }

    /// Like [`execute`](Self::execute), pinned to `network`.
    pub async fn execute_on(
        &self,
        network: NetworkId,
        contract: &str,
        request: &ExecuteRequest,
    ) -> SessionResult<TransactionOutcome> {
        let conn = self.inner.connection(Some(network))?;
        self.run_execute(conn, contract, request).await
    }

    async fn run_query(&self, conn: Connection, contract: &str, msg: &QueryMsg) -> SessionResult<Value> {
        let contract = require_contract(contract, conn.network)?;
        let payload = serde_json::to_value(msg).map_err(|e| SessionError::InvalidInput(e.to_string()))?;

        match conn.client.query_contract_smart(contract, &payload).await {
            Ok(response) => {
                metrics::record_query("success");
                Ok(response)
            }
            Err(e) => {
                metrics::record_query("failure");
                tracing::warn!(session_id = %conn.id, contract = %contract, error = %e, "Contract query failed");
                Err(SessionError::QueryFailed(e.to_string()))
            }
        }
    }

    async fn run_execute(
        &self,
        conn: Connection,
        contract: &str,
        request: &ExecuteRequest,
    ) -> SessionResult<TransactionOutcome> {
        let contract = require_contract(contract, conn.network)?;
        let payload = serde_json::to_value(request.message())
            .map_err(|e| SessionError::InvalidInput(e.to_string()))?;
        let funds = request.funds(resolve(conn.network).native_denom());

        tracing::debug!(
            session_id = %conn.id,
            contract = %contract,
            kind = request.kind(),
            funds = funds.len(),
            "Submitting contract execute"
        );

        match conn
            .client
            .execute(&conn.address, contract, &payload, FeePolicy::Auto, None, &funds)
            .await
        {
            Ok(outcome) => {
                metrics::record_execute(request.kind(), "success");
                tracing::info!(
                    session_id = %conn.id,
                    kind = request.kind(),
                    tx_hash = %outcome.transaction_hash,
                    "Transaction included"
                );
                Ok(outcome)
            }
            Err(e) => {
                metrics::record_execute(request.kind(), "failure");
                tracing::warn!(session_id = %conn.id, kind = request.kind(), error = %e, "Transaction failed");
                Err(SessionError::TransactionFailed(e.to_string()))
            }
        }
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("provider", &self.inner.provider.is_some())
            .field("status", &self.status())
            .finish()
    }
}

async fn suggest_chain(provider: &dyn WalletProvider, profile: &NetworkProfile) {
    let suggestion = ChainSuggestion::from_profile(profile);
    match provider.experimental_suggest_chain(&suggestion).await {
        Ok(()) => {
            metrics::record_chain_suggestion("accepted");
            tracing::debug!(chain_id = profile.chain_id, "Chain suggested to wallet");
        }
        Err(ProviderError::Rejected(reason)) => {
            metrics::record_chain_suggestion("rejected");
            tracing::info!(
                chain_id = profile.chain_id,
                reason = %reason,
                "Chain suggestion rejected, continuing (chain may already be registered)"
            );
        }
        Err(ProviderError::Failed(reason)) => {
            metrics::record_chain_suggestion("failed");
            tracing::warn!(chain_id = profile.chain_id, error = %reason, "Chain suggestion failed, continuing");
        }
    }
}

fn provider_error(err: ProviderError) -> SessionError {
    match err {
        ProviderError::Rejected(reason) => SessionError::WalletAuthorizationDenied(reason),
        ProviderError::Failed(reason) => SessionError::WalletProvider(reason),
    }
}

fn require_contract(contract: &str, network: NetworkId) -> SessionResult<&str> {
    let contract = contract.trim();
    if contract.is_empty() {
        return Err(SessionError::ContractNotConfigured { network });
    }
    Ok(contract)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::types::{ChainError, ChainResult};
    use crate::wallet::provider::OfflineSigner;
    use async_trait::async_trait;

    struct UnreachableConnector;

    #[async_trait]
    impl ChainConnector for UnreachableConnector {
        async fn connect_with_signer(
            &self,
            rpc_endpoint: &str,
            _signer: Arc<dyn OfflineSigner>,
            _options: SigningClientOptions,
        ) -> ChainResult<Arc<dyn SigningClient>> {
            Err(ChainError::Rpc(format!("{} unreachable", rpc_endpoint)))
        }
    }

    fn session_without_wallet() -> WalletSession {
        WalletSession::new(None, Arc::new(UnreachableConnector))
    }

    #[test]
    fn test_initial_state() {
        let session = session_without_wallet();
        assert_eq!(session.status(), SessionStatus::Disconnected);
        assert_eq!(session.network(), NetworkId::Testnet);
        assert!(session.address().is_none());
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_missing_wallet() {
        let session = session_without_wallet();
        let err = session.connect(NetworkId::Mainnet).await.unwrap_err();
        assert_eq!(err, SessionError::WalletNotAvailable);
        assert_eq!(session.status(), SessionStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_operations_require_connection() {
        let session = session_without_wallet();
        let err = session.query("core1pool", &QueryMsg::Balance {}).await.unwrap_err();
        assert_eq!(err, SessionError::NotConnected);

        let err = session.execute("core1pool", &ExecuteRequest::Withdraw).await.unwrap_err();
        assert_eq!(err, SessionError::NotConnected);
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let session = session_without_wallet();
        session.disconnect();
        session.disconnect();
        assert_eq!(session.status(), SessionStatus::Disconnected);
    }

    #[test]
    fn test_provider_error_mapping() {
        assert_eq!(
            provider_error(ProviderError::Rejected("no".into())),
            SessionError::WalletAuthorizationDenied("no".into())
        );
        assert_eq!(
            provider_error(ProviderError::Failed("locked".into())),
            SessionError::WalletProvider("locked".into())
        );
    }

    #[test]
    fn test_require_contract() {
        assert_eq!(require_contract(" core1pool ", NetworkId::Mainnet), Ok("core1pool"));
        assert_eq!(
            require_contract("", NetworkId::Testnet),
            Err(SessionError::ContractNotConfigured { network: NetworkId::Testnet })
        );
    }
}
