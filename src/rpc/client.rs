//! HTTP JSON-RPC client bound to a single Labchain node

use crate::chain::{Block, Transaction, TransmittableTransaction};
use crate::error::{NetworkError, NetworkResult};
use crate::rpc::types::*;
use crate::rpc::NodeRpc;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, trace};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Node JSON-RPC endpoint, e.g. `http://172.18.0.2:8080`
    pub url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Configuration for `url` with default timeouts
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// JSON-RPC client for one node
///
/// Request ids start at zero and advance only after a round trip that
/// produced a usable response; a failed request does not consume an id.
#[derive(Debug)]
pub struct LabchainClient {
    config: ClientConfig,
    http: reqwest::Client,
    request_id: AtomicU64,
}

impl LabchainClient {
    /// Create a client; an empty URL is rejected immediately
    pub fn new(config: ClientConfig) -> NetworkResult<Self> {
        if config.url.trim().is_empty() {
            return Err(NetworkError::Configuration {
                reason: "Not connected to a node: empty node URL".to_string(),
            });
        }
        reqwest::Url::parse(&config.url).map_err(|_| NetworkError::InvalidUrl {
            url: config.url.clone(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| NetworkError::Transport {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            config,
            http,
            request_id: AtomicU64::new(0),
        })
    }

    /// Id the next request will carry
    pub fn next_request_id(&self) -> u64 {
        self.request_id.load(Ordering::SeqCst)
    }

    /// Issue one JSON-RPC call and return its `result` member
    pub async fn send_json_rpc(&self, method: &str, params: Option<Value>) -> NetworkResult<Value> {
        let id = self.next_request_id();
        let request = JsonRpcRequest {
            method,
            jsonrpc: JSONRPC_VERSION,
            id,
            params,
        };
        trace!(url = %self.config.url, method, id, "JSON-RPC request");

        let response = self
            .http
            .post(&self.config.url)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        let mut body: serde_json::Map<String, Value> =
            response.json().await.map_err(|e| NetworkError::MalformedResponse {
                reason: format!("Response is not a JSON object: {}", e),
            })?;

        if let Some(error) = body.remove("error").filter(|e| !e.is_null()) {
            let error: JsonRpcErrorObject = serde_json::from_value(error).map_err(|e| NetworkError::MalformedResponse {
                reason: format!("Unreadable error object: {}", e),
            })?;
            return Err(NetworkError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let result = body.remove("result").ok_or_else(|| NetworkError::MalformedResponse {
            reason: "Response has no result member".to_string(),
        })?;

        self.request_id.fetch_add(1, Ordering::SeqCst);
        Ok(result)
    }

    /// Look a transaction up by hash; `None` when the node does not know it
    ///
    /// Returns the transaction together with the hash of the block holding it.
    pub async fn get_transaction(&self, transaction_hash: &str) -> NetworkResult<Option<(Transaction, String)>> {
        let result = self
            .send_json_rpc(METHOD_REQUEST_TRANSACTION, Some(json!([transaction_hash])))
            .await?;
        if result.is_null() {
            return Ok(None);
        }

        let (wire, block_hash): (TransmittableTransaction, Option<String>) =
            serde_json::from_value(result).map_err(|e| NetworkError::MalformedResponse {
                reason: format!("Unexpected requestTransaction result: {}", e),
            })?;
        Ok(Some((Transaction::from_transmittable(wire), block_hash.unwrap_or_default())))
    }
}

#[async_trait]
impl NodeRpc for LabchainClient {
    fn url(&self) -> &str {
        &self.config.url
    }

    async fn get_block(&self, number: Option<u64>) -> NetworkResult<Vec<Block>> {
        let params = number.map(|n| json!([n]));
        let result = self.send_json_rpc(METHOD_REQUEST_BLOCK, params).await?;

        let raw_blocks = match result {
            Value::Array(blocks) => blocks,
            Value::Null => Vec::new(),
            single @ Value::Object(_) => vec![single],
            other => {
                return Err(NetworkError::MalformedResponse {
                    reason: format!("requestBlock returned {}", other),
                })
            }
        };

        let blocks = raw_blocks
            .into_iter()
            .map(Block::from_json)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(url = %self.config.url, blocks = blocks.len(), "Fetched blocks");
        Ok(blocks)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> NetworkResult<Value> {
        let wire = serde_json::to_value(transaction.to_transmittable()).map_err(|e| NetworkError::MalformedResponse {
            reason: format!("Failed to encode transaction: {}", e),
        })?;
        self.send_json_rpc(METHOD_SEND_TRANSACTION, Some(Value::Array(vec![wire])))
            .await
    }

    async fn get_connected_peers(&self) -> NetworkResult<Value> {
        self.send_json_rpc(METHOD_GET_PEERS, None).await
    }
}

fn map_reqwest_error(error: reqwest::Error) -> NetworkError {
    if error.is_timeout() {
        NetworkError::Timeout
    } else {
        NetworkError::Transport {
            reason: error.to_string(),
        }
    }
}
