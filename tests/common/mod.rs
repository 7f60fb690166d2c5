//! Shared utilities for integration testing.
//!
//! Scriptable stand-ins for the wallet extension and the chain client, plus a
//! raw-TCP HTTP backend for the REST client.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Notify};

use flash_loan_client::chain::{
    ChainConnector, ChainError, ChainResult, Coin, FeePolicy, SigningClient, SigningClientOptions,
    TransactionOutcome,
};
use flash_loan_client::wallet::{
    AccountData, ChainSuggestion, KeystoreEvent, KeystoreNotifier, OfflineSigner, ProviderError,
    WalletProvider, WalletSession,
};

pub const TEST_ADDRESS: &str = "testcore1qy352eufqy352eufqy352eufqy352euf7xk3sm";
pub const TX_HASH: &str = "9F2A6C1B7E4D3A5F8C0B1E2D4A6C8E0F1A3B5C7D9E1F3A5B7C9D1E3F5A7B9C1D";

pub fn account(address: &str) -> AccountData {
    AccountData {
        address: address.to_string(),
        algo: "secp256k1".to_string(),
        pubkey: vec![2; 33],
    }
}

/// Wallet extension double.
pub struct StubWallet {
    pub keystore: KeystoreNotifier,
    suggest_result: Result<(), ProviderError>,
    enable_result: Result<(), ProviderError>,
    accounts: Result<Vec<AccountData>, ProviderError>,
    /// When set, `enable` waits for a notification before answering.
    enable_gate: Option<Arc<Notify>>,
    suggestions: Mutex<Vec<String>>,
    pub enable_calls: AtomicUsize,
    pub account_calls: Arc<AtomicUsize>,
}

impl StubWallet {
    pub fn new() -> Self {
        Self {
            keystore: KeystoreNotifier::new(),
            suggest_result: Ok(()),
            enable_result: Ok(()),
            accounts: Ok(vec![account(TEST_ADDRESS)]),
            enable_gate: None,
            suggestions: Mutex::new(Vec::new()),
            enable_calls: AtomicUsize::new(0),
            account_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_suggest_error(mut self, err: ProviderError) -> Self {
        self.suggest_result = Err(err);
        self
    }

    pub fn with_enable_error(mut self, err: ProviderError) -> Self {
        self.enable_result = Err(err);
        self
    }

    pub fn with_accounts(mut self, accounts: Result<Vec<AccountData>, ProviderError>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_enable_gate(mut self, gate: Arc<Notify>) -> Self {
        self.enable_gate = Some(gate);
        self
    }

    /// Chain ids suggested so far.
    pub fn suggested_chains(&self) -> Vec<String> {
        self.suggestions.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletProvider for StubWallet {
    async fn experimental_suggest_chain(&self, chain: &ChainSuggestion) -> Result<(), ProviderError> {
        self.suggestions.lock().unwrap().push(chain.chain_id.to_string());
        self.suggest_result.clone()
    }

    async fn enable(&self, _chain_id: &str) -> Result<(), ProviderError> {
        self.enable_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.enable_gate {
            gate.notified().await;
        }
        self.enable_result.clone()
    }

    fn offline_signer(&self, _chain_id: &str) -> Result<Arc<dyn OfflineSigner>, ProviderError> {
        Ok(Arc::new(StubSigner {
            accounts: self.accounts.clone(),
            calls: self.account_calls.clone(),
        }))
    }

    fn subscribe_keystore_changes(&self) -> broadcast::Receiver<KeystoreEvent> {
        self.keystore.subscribe()
    }
}

pub struct StubSigner {
    accounts: Result<Vec<AccountData>, ProviderError>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl OfflineSigner for StubSigner {
    async fn get_accounts(&self) -> Result<Vec<AccountData>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.accounts.clone()
    }

    async fn sign_direct(&self, _signer_address: &str, sign_doc: &[u8]) -> Result<Vec<u8>, ProviderError> {
        Ok(sign_doc.iter().rev().copied().collect())
    }
}

/// One recorded `SigningClient::execute` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteCall {
    pub sender: String,
    pub contract: String,
    pub msg: Value,
    pub fee: FeePolicy,
    pub memo: Option<String>,
    pub funds: Vec<Coin>,
}

/// Chain client double that records every call.
pub struct StubSigningClient {
    pub queries: Mutex<Vec<(String, Value)>>,
    pub executes: Mutex<Vec<ExecuteCall>>,
    query_response: Mutex<ChainResult<Value>>,
    execute_error: Mutex<Option<ChainError>>,
}

impl StubSigningClient {
    pub fn new() -> Self {
        Self {
            queries: Mutex::new(Vec::new()),
            executes: Mutex::new(Vec::new()),
            query_response: Mutex::new(Ok(json!({}))),
            execute_error: Mutex::new(None),
        }
    }

    pub fn respond_with(&self, response: ChainResult<Value>) {
        *self.query_response.lock().unwrap() = response;
    }

    pub fn fail_executes(&self, err: ChainError) {
        *self.execute_error.lock().unwrap() = Some(err);
    }

    pub fn io_count(&self) -> usize {
        self.queries.lock().unwrap().len() + self.executes.lock().unwrap().len()
    }

    pub fn last_execute(&self) -> Option<ExecuteCall> {
        self.executes.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SigningClient for StubSigningClient {
    async fn query_contract_smart(&self, contract: &str, msg: &Value) -> ChainResult<Value> {
        self.queries
            .lock()
            .unwrap()
            .push((contract.to_string(), msg.clone()));
        self.query_response.lock().unwrap().clone()
    }

    async fn execute(
        &self,
        sender: &str,
        contract: &str,
        msg: &Value,
        fee: FeePolicy,
        memo: Option<&str>,
        funds: &[Coin],
    ) -> ChainResult<TransactionOutcome> {
        self.executes.lock().unwrap().push(ExecuteCall {
            sender: sender.to_string(),
            contract: contract.to_string(),
            msg: msg.clone(),
            fee,
            memo: memo.map(str::to_string),
            funds: funds.to_vec(),
        });
        match self.execute_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(TransactionOutcome {
                transaction_hash: TX_HASH.to_string(),
            }),
        }
    }
}

/// Connector double handing out one shared [`StubSigningClient`].
pub struct StubConnector {
    pub client: Arc<StubSigningClient>,
    failure: Option<ChainError>,
    pub connects: Mutex<Vec<(String, String)>>,
}

impl StubConnector {
    pub fn new() -> Self {
        Self {
            client: Arc::new(StubSigningClient::new()),
            failure: None,
            connects: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: ChainError) -> Self {
        Self {
            failure: Some(err),
            ..Self::new()
        }
    }

    /// `(rpc endpoint, gas price)` of every connect call.
    pub fn connect_calls(&self) -> Vec<(String, String)> {
        self.connects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainConnector for StubConnector {
    async fn connect_with_signer(
        &self,
        rpc_endpoint: &str,
        _signer: Arc<dyn OfflineSigner>,
        options: SigningClientOptions,
    ) -> ChainResult<Arc<dyn SigningClient>> {
        self.connects
            .lock()
            .unwrap()
            .push((rpc_endpoint.to_string(), options.gas_price.to_string()));
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.client.clone()),
        }
    }
}

/// A session wired to fresh stubs.
pub fn session_with(wallet: StubWallet, connector: StubConnector) -> (WalletSession, Arc<StubWallet>, Arc<StubConnector>) {
    let wallet = Arc::new(wallet);
    let connector = Arc::new(connector);
    let session = WalletSession::new(Some(wallet.clone()), connector.clone());
    (session, wallet, connector)
}

/// Poll `cond` until it holds or a second passes.
pub async fn eventually<F: Fn() -> bool>(cond: F) -> bool {
    tokio::time::timeout(Duration::from_secs(1), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .is_ok()
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the request path and returns status and JSON body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let path = read_request_path(&mut socket).await;
                        let (status, body) = f(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Backend answering every request with the same status and body.
pub async fn start_mock_backend(status: u16, body: &'static str) -> SocketAddr {
    start_programmable_backend(move |_| async move { (status, body.to_string()) }).await
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn read_request_path(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf)
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string()
}
