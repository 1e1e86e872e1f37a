//! Directory backed by the composer REST service

use crate::error::{NetworkError, NetworkResult};
use crate::nodes::{NodeDescriptor, NodeDirectory};
use crate::rpc::{ClientConfig, LabchainClient, NodeRpc};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Composer endpoint listing node instances
pub const PATH_GET_INSTANCES: &str = "getInstances";

/// Composer endpoint accepting benchmark records
pub const PATH_WATCH_TRANSACTIONS: &str = "watchTransactions";

/// Composer connection settings
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Composer base URL, e.g. `http://localhost:8080`
    pub base_url: String,
    /// Per-request timeout for composer calls and the node clients it hands out
    pub request_timeout: Duration,
    /// Node used when a run names no receivers
    pub fallback_url: Option<String>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout: Duration::from_secs(30),
            fallback_url: Some("http://localhost:8082".to_string()),
        }
    }
}

impl ComposerConfig {
    /// Absolute URL of a composer endpoint
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    pub(crate) fn http_client(&self) -> NetworkResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| NetworkError::Transport {
                reason: format!("Failed to build HTTP client: {}", e),
            })
    }
}

/// Resolves nodes through `GET {base}/getInstances`
#[derive(Debug)]
pub struct ComposerDirectory {
    config: ComposerConfig,
    http: reqwest::Client,
}

impl ComposerDirectory {
    /// Create a directory for the composer at `config.base_url`
    pub fn new(config: ComposerConfig) -> NetworkResult<Self> {
        reqwest::Url::parse(&config.base_url).map_err(|_| NetworkError::InvalidUrl {
            url: config.base_url.clone(),
        })?;
        let http = config.http_client()?;
        Ok(Self { config, http })
    }

    /// Every instance the composer knows, running or not
    pub async fn instances(&self) -> NetworkResult<Vec<NodeDescriptor>> {
        let url = self.config.endpoint(PATH_GET_INSTANCES);
        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                NetworkError::Timeout
            } else {
                NetworkError::Transport { reason: e.to_string() }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let instances: Vec<NodeDescriptor> = response.json().await.map_err(|e| NetworkError::MalformedResponse {
            reason: format!("Unexpected getInstances body: {}", e),
        })?;
        debug!(composer = %self.config.base_url, instances = instances.len(), "Listed instances");
        Ok(instances)
    }

    fn client_at(&self, url: String) -> NetworkResult<Arc<dyn NodeRpc>> {
        let client = LabchainClient::new(ClientConfig {
            url,
            request_timeout: self.config.request_timeout,
        })?;
        Ok(Arc::new(client))
    }
}

#[async_trait]
impl NodeDirectory for ComposerDirectory {
    fn client_for(&self, node: &NodeDescriptor) -> NetworkResult<Arc<dyn NodeRpc>> {
        self.client_at(node.endpoint_url()?)
    }

    fn fallback_client(&self) -> NetworkResult<Arc<dyn NodeRpc>> {
        let url = self.config.fallback_url.clone().ok_or_else(|| NetworkError::Configuration {
            reason: "no fallback node configured".to_string(),
        })?;
        self.client_at(url)
    }

    async fn running_nodes(&self) -> NetworkResult<Vec<NodeDescriptor>> {
        let instances = self.instances().await?;
        let total = instances.len();
        let running: Vec<_> = instances.into_iter().filter(NodeDescriptor::is_running).collect();
        if running.len() < total {
            warn!(running = running.len(), total, "Some instances are not running");
        }
        Ok(running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let config = ComposerConfig {
            base_url: "http://composer:8080/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.endpoint(PATH_GET_INSTANCES), "http://composer:8080/getInstances");
        assert_eq!(config.endpoint(PATH_WATCH_TRANSACTIONS), "http://composer:8080/watchTransactions");
    }

    #[test]
    fn test_clients_from_descriptors() {
        let directory = ComposerDirectory::new(ComposerConfig::default()).unwrap();
        let node = NodeDescriptor {
            name: "labchain_1".to_string(),
            status: "running".to_string(),
            ipv4: "172.18.0.3/16".to_string(),
            port: vec!["8080/tcp".to_string()],
            ..Default::default()
        };

        assert_eq!(directory.client_for(&node).unwrap().url(), "http://172.18.0.3:8080");
        assert_eq!(directory.fallback_client().unwrap().url(), "http://localhost:8082");
        assert!(directory.client_for(&NodeDescriptor::named("bare")).is_err());
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let config = ComposerConfig {
            base_url: "::nope".to_string(),
            ..Default::default()
        };
        assert!(matches!(ComposerDirectory::new(config), Err(NetworkError::InvalidUrl { .. })));
    }
}
