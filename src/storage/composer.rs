//! Result hand-off to the composer service

use crate::benchmark::BenchmarkRecord;
use crate::error::{NetworkError, StorageResult};
use crate::nodes::composer::{ComposerConfig, PATH_WATCH_TRANSACTIONS};
use crate::storage::{validate_run_name, ResultStore};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

/// Body of `POST /watchTransactions`
#[derive(Debug, Serialize)]
pub struct WatchTransactionsRequest<'a> {
    /// Name the composer stores the data under
    pub filename: &'a str,
    /// Records of the run
    pub transactions: &'a [BenchmarkRecord],
}

/// Posts batches to `{base}/watchTransactions`
#[derive(Debug)]
pub struct ComposerResultStore {
    url: String,
    http: reqwest::Client,
}

impl ComposerResultStore {
    /// Store talking to the composer at `config.base_url`
    pub fn new(config: &ComposerConfig) -> StorageResult<Self> {
        let url = config.endpoint(PATH_WATCH_TRANSACTIONS);
        reqwest::Url::parse(&url).map_err(|_| NetworkError::InvalidUrl { url: url.clone() })?;
        Ok(Self {
            url,
            http: config.http_client()?,
        })
    }

    /// Endpoint batches are posted to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ResultStore for ComposerResultStore {
    async fn store_batch(&self, run_name: &str, records: &[BenchmarkRecord]) -> StorageResult<()> {
        validate_run_name(run_name)?;
        let body = WatchTransactionsRequest {
            filename: run_name,
            transactions: records,
        };

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NetworkError::Transport { reason: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }
            .into());
        }

        debug!(url = %self.url, records = records.len(), "Handed records to composer");
        Ok(())
    }
}
