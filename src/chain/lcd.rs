//! REST (LCD) client for wallet-less smart queries.
//!
//! # Responsibilities
//! - Run contract smart queries over the chain's REST endpoint
//! - Check which chain a REST endpoint serves
//! - Handle timeouts and fail over between endpoints

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::chain::types::{ChainError, ChainResult};
use crate::contract::msg::QueryMsg;
use crate::network::NetworkProfile;
use crate::observability::metrics;

/// Read-only REST client with failover support.
#[derive(Clone)]
pub struct LcdClient {
    http: reqwest::Client,
    /// Primary endpoint first, then failovers.
    endpoints: Vec<Url>,
    timeout_secs: u64,
}

impl LcdClient {
    /// Create a client over `endpoints`, tried in order.
    ///
    /// The first endpoint must parse; later invalid ones are skipped.
    pub fn new(endpoints: &[String], timeout_secs: u64) -> ChainResult<Self> {
        let (primary, failovers) = endpoints
            .split_first()
            .ok_or_else(|| ChainError::Rpc("No REST endpoint configured".to_string()))?;

        let mut parsed = vec![Url::parse(primary).map_err(|e| {
            ChainError::Rpc(format!("Invalid REST URL '{}': {}", primary, e))
        })?];

        for url_str in failovers {
            match Url::parse(url_str) {
                Ok(url) => parsed.push(url),
                Err(e) => tracing::warn!(url = %url_str, error = %e, "Ignoring invalid failover REST URL"),
            }
        }

        Ok(Self {
            http: reqwest::Client::new(),
            endpoints: parsed,
            timeout_secs,
        })
    }

    /// Client for a network's built-in REST endpoint plus configured failovers.
    pub fn for_network(
        profile: &NetworkProfile,
        failover_urls: &[String],
        timeout_secs: u64,
    ) -> ChainResult<Self> {
        let mut endpoints = vec![profile.rest.to_string()];
        endpoints.extend(failover_urls.iter().cloned());
        Self::new(&endpoints, timeout_secs)
    }

    /// Run a smart query and return the response's `data` field verbatim.
    pub async fn query_contract_smart(&self, contract: &str, msg: &QueryMsg) -> ChainResult<Value> {
        let payload = serde_json::to_vec(msg)
            .map_err(|e| ChainError::InvalidResponse(format!("Unencodable query: {}", e)))?;
        let encoded = STANDARD.encode(payload);

        let body = self
            .get_json(&["cosmwasm", "wasm", "v1", "contract", contract, "smart", &encoded])
            .await?;

        match body {
            Value::Object(mut map) => map
                .remove("data")
                .ok_or_else(|| ChainError::InvalidResponse("Missing 'data' field".to_string())),
            other => Err(ChainError::InvalidResponse(format!(
                "Expected JSON object, got {}",
                other
            ))),
        }
    }

    /// Chain id reported by the node behind the REST endpoint.
    pub async fn node_chain_id(&self) -> ChainResult<String> {
        let body = self
            .get_json(&["cosmos", "base", "tendermint", "v1beta1", "node_info"])
            .await?;

        body.pointer("/default_node_info/network")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ChainError::InvalidResponse("Missing default_node_info.network".to_string()))
    }

    /// Verify the endpoint serves `expected`.
    pub async fn verify_chain_id(&self, expected: &str) -> ChainResult<()> {
        let actual = self.node_chain_id().await?;
        if actual != expected {
            return Err(ChainError::ChainMismatch {
                expected: expected.to_string(),
                actual,
            });
        }
        Ok(())
    }

    /// Endpoints in the order they are tried.
    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    async fn get_json(&self, segments: &[&str]) -> ChainResult<Value> {
        let timeout_duration = Duration::from_secs(self.timeout_secs);
        let mut timeouts = 0;

        for (i, base) in self.endpoints.iter().enumerate() {
            let url = endpoint_url(base, segments)?;
            let fut = async {
                let response = self.http.get(url.clone()).send().await?;
                let status = response.status();
                let text = response.text().await?;
                Ok::<_, reqwest::Error>((status, text))
            };

            match timeout(timeout_duration, fut).await {
                Ok(Ok((status, text))) if status.is_success() => {
                    metrics::record_lcd_request("success");
                    return serde_json::from_str(&text)
                        .map_err(|e| ChainError::InvalidResponse(e.to_string()));
                }
                Ok(Ok((status, text))) => {
                    // A JSON error message is the node's verdict, not an outage.
                    if let Some(message) = error_message(&text) {
                        metrics::record_lcd_request("rejected");
                        return Err(ChainError::Contract(message));
                    }
                    metrics::record_lcd_request("error");
                    tracing::warn!(endpoint_idx = i, status = %status, "REST error, trying next endpoint");
                }
                Ok(Err(e)) => {
                    metrics::record_lcd_request("error");
                    tracing::warn!(endpoint_idx = i, error = %e, "REST error, trying next endpoint");
                }
                Err(_) => {
                    metrics::record_lcd_request("timeout");
                    timeouts += 1;
                    tracing::warn!(endpoint_idx = i, "REST timeout, trying next endpoint");
                }
            }
        }

        if timeouts == self.endpoints.len() {
            return Err(ChainError::Timeout(self.timeout_secs));
        }
        Err(ChainError::Rpc("All REST endpoints failed".to_string()))
    }
}

impl std::fmt::Debug for LcdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LcdClient")
            .field("endpoints", &self.endpoints.len())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn endpoint_url(base: &Url, segments: &[&str]) -> ChainResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ChainError::Rpc(format!("REST URL '{}' cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}
