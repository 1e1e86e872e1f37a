//! Types for JSON-RPC communication with a node

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC protocol version sent with every request
pub const JSONRPC_VERSION: &str = "2.0";

/// Method returning the peers of a node
pub const METHOD_GET_PEERS: &str = "getPeers";

/// Method returning the latest (or a numbered) block, possibly several fork tips
pub const METHOD_REQUEST_BLOCK: &str = "requestBlock";

/// Method accepting a transmittable transaction
pub const METHOD_SEND_TRANSACTION: &str = "sendTransaction";

/// Method looking a transaction up by hash
pub const METHOD_REQUEST_TRANSACTION: &str = "requestTransaction";

/// Request envelope
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    /// Method name
    pub method: &'a str,
    /// Always `"2.0"`
    pub jsonrpc: &'static str,
    /// Request id
    pub id: u64,
    /// Positional parameters, omitted when there are none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Error object of a failed call
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcErrorObject {
    /// Error code
    #[serde(default)]
    pub code: i64,
    /// Human readable message
    #[serde(default)]
    pub message: String,
}
