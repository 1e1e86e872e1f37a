//! Node lifecycle and discovery boundary
//!
//! The benchmark engine only needs two things from whatever manages the
//! network: "give me a client for node X" and "list running nodes". The
//! [`NodeDirectory`] trait captures exactly that. [`StaticDirectory`] serves a
//! fixed set of clients and [`ComposerDirectory`] asks the composer REST
//! service.

pub mod composer;

pub use composer::{ComposerConfig, ComposerDirectory};

use crate::error::{NetworkError, NetworkResult};
use crate::rpc::NodeRpc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Status string of a node that accepts requests
pub const STATUS_RUNNING: &str = "running";

/// A node instance as described by the lifecycle service
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Container id
    #[serde(default)]
    pub id: String,
    /// Instance name
    pub name: String,
    /// Lifecycle status, e.g. `running` or `exited`
    #[serde(default)]
    pub status: String,
    /// Address inside the node network, possibly with a CIDR suffix
    #[serde(default)]
    pub ipv4: String,
    /// Exposed ports such as `8080/tcp`
    #[serde(default)]
    pub port: Vec<String>,
}

impl NodeDescriptor {
    /// A running node known only by name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: STATUS_RUNNING.to_string(),
            ..Default::default()
        }
    }

    /// Whether the node is up
    pub fn is_running(&self) -> bool {
        self.status == STATUS_RUNNING
    }

    /// JSON-RPC endpoint derived from address and first exposed port
    pub fn endpoint_url(&self) -> NetworkResult<String> {
        let host = self.ipv4.split('/').next().unwrap_or_default().trim();
        if host.is_empty() {
            return Err(NetworkError::Configuration {
                reason: format!("node {} has no IPv4 address", self.name),
            });
        }

        let port = self
            .port
            .first()
            .and_then(|p| p.split('/').next())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| NetworkError::Configuration {
                reason: format!("node {} exposes no port", self.name),
            })?;

        Ok(format!("http://{}:{}", host, port))
    }
}

/// Source of node clients
#[async_trait]
pub trait NodeDirectory: Send + Sync {
    /// Client bound to `node`
    fn client_for(&self, node: &NodeDescriptor) -> NetworkResult<Arc<dyn NodeRpc>>;

    /// Client used when a run names no receivers at all
    fn fallback_client(&self) -> NetworkResult<Arc<dyn NodeRpc>>;

    /// Nodes currently running
    async fn running_nodes(&self) -> NetworkResult<Vec<NodeDescriptor>>;
}

/// Directory over a fixed set of clients, keyed by node name
#[derive(Default, Clone)]
pub struct StaticDirectory {
    nodes: Vec<NodeDescriptor>,
    clients: HashMap<String, Arc<dyn NodeRpc>>,
    fallback: Option<Arc<dyn NodeRpc>>,
}

impl StaticDirectory {
    /// Empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `client` under `node.name`
    pub fn with_node(mut self, node: NodeDescriptor, client: Arc<dyn NodeRpc>) -> Self {
        self.clients.insert(node.name.clone(), client);
        self.nodes.retain(|n| n.name != node.name);
        self.nodes.push(node);
        self
    }

    /// Client for runs without receivers
    pub fn with_fallback(mut self, client: Arc<dyn NodeRpc>) -> Self {
        self.fallback = Some(client);
        self
    }

    /// Registered nodes in insertion order
    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }
}

#[async_trait]
impl NodeDirectory for StaticDirectory {
    fn client_for(&self, node: &NodeDescriptor) -> NetworkResult<Arc<dyn NodeRpc>> {
        self.clients
            .get(&node.name)
            .cloned()
            .ok_or_else(|| NetworkError::Configuration {
                reason: format!("unknown node {}", node.name),
            })
    }

    fn fallback_client(&self) -> NetworkResult<Arc<dyn NodeRpc>> {
        self.fallback.clone().ok_or_else(|| NetworkError::Configuration {
            reason: "no fallback node configured".to_string(),
        })
    }

    async fn running_nodes(&self) -> NetworkResult<Vec<NodeDescriptor>> {
        Ok(self.nodes.iter().filter(|n| n.is_running()).cloned().collect())
    }
}

impl std::fmt::Debug for StaticDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticDirectory")
            .field("nodes", &self.nodes)
            .field("fallback", &self.fallback.as_ref().map(|c| c.url().to_string()))
            .finish()
    }
}
