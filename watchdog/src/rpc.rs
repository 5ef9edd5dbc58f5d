//! JSON-RPC client for the monitored node
//!
//! Every call is bounded by the client timeout and returns either a typed
//! value or an error. The monitor treats every error the same way: the
//! observation is unknown.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::constants::rpc_methods;

/// Read-only view of the node used by the health monitor
#[async_trait]
pub trait NodeRpc: Send + Sync {
    async fn consensus_established(&self) -> Result<bool>;
    async fn block_number(&self) -> Result<u64>;
    async fn epoch_number(&self) -> Result<u64>;
    async fn batch_number(&self) -> Result<u64>;
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Deserialize)]
pub struct RpcEnvelope<T> {
    pub result: Option<RpcResult<T>>,
    pub error: Option<RpcErrorObject>,
}

/// Methods answer either `{"data": value, ...}` or a bare value; both decode the same.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RpcResult<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> RpcResult<T> {
    pub fn into_inner(self) -> T {
        match self {
            RpcResult::Wrapped { data } => data,
            RpcResult::Bare(value) => value,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// Decode a raw JSON-RPC response body into the method's value type.
pub fn decode_response<T: DeserializeOwned>(method: &str, body: &str) -> Result<T> {
    let envelope: RpcEnvelope<T> = serde_json::from_str(body)
        .map_err(|e| anyhow!("Malformed {} response: {}", method, e))?;

    if let Some(error) = envelope.error {
        return Err(anyhow!(
            "{} returned RPC error {}: {}",
            method,
            error.code,
            error.message
        ));
    }

    envelope
        .result
        .map(RpcResult::into_inner)
        .ok_or_else(|| anyhow!("{} response has no result", method))
}

pub struct JsonRpcClient {
    client: Client,
    url: String,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str) -> Result<T> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": []
        });

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to call {} on {}: {}", method, self.url, e))?;

        if !response.status().is_success() {
            return Err(anyhow!("{} returned HTTP {}", method, response.status()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read {} response: {}", method, e))?;

        debug!("{} response: {}", method, body);
        decode_response(method, &body)
    }
}

#[async_trait]
impl NodeRpc for JsonRpcClient {
    async fn consensus_established(&self) -> Result<bool> {
        self.call(rpc_methods::IS_CONSENSUS_ESTABLISHED).await
    }

    async fn block_number(&self) -> Result<u64> {
        self.call(rpc_methods::GET_BLOCK_NUMBER).await
    }

    async fn epoch_number(&self) -> Result<u64> {
        self.call(rpc_methods::GET_EPOCH_NUMBER).await
    }

    async fn batch_number(&self) -> Result<u64> {
        self.call(rpc_methods::GET_BATCH_NUMBER).await
    }
}
