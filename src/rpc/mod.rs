//! Node RPC transport
//!
//! JSON-RPC 2.0 over HTTP POST to a single node URL. [`NodeRpc`] is the seam
//! the benchmark engine talks through; [`LabchainClient`] is the HTTP
//! implementation.

pub mod client;
pub mod types;

pub use client::{ClientConfig, LabchainClient};
pub use types::{JsonRpcRequest, JSONRPC_VERSION};

use crate::chain::{Block, Transaction};
use crate::error::NetworkResult;
use async_trait::async_trait;
use serde_json::Value;

/// Operations a benchmark needs from one node
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// Endpoint this client is bound to
    fn url(&self) -> &str;

    /// Latest block(s), or those numbered `number`
    ///
    /// Several blocks come back when the node holds more than one fork tip.
    async fn get_block(&self, number: Option<u64>) -> NetworkResult<Vec<Block>>;

    /// Submit a transaction; the acknowledgement is opaque
    async fn send_transaction(&self, transaction: &Transaction) -> NetworkResult<Value>;

    /// Peer list exactly as the node reports it
    async fn get_connected_peers(&self) -> NetworkResult<Value>;
}
