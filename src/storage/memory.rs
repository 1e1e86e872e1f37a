//! In-memory result store

use crate::benchmark::BenchmarkRecord;
use crate::error::StorageResult;
use crate::storage::{validate_run_name, ResultStore};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One stored hand-off
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBatch {
    /// Run name the batch was stored under
    pub run_name: String,
    /// Records as handed over
    pub records: Vec<BenchmarkRecord>,
}

/// Keeps every batch in memory, in arrival order
#[derive(Debug, Clone, Default)]
pub struct MemoryResultStore {
    batches: Arc<Mutex<Vec<StoredBatch>>>,
}

impl MemoryResultStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored batches
    pub async fn batches(&self) -> Vec<StoredBatch> {
        self.batches.lock().await.clone()
    }

    /// Records of the most recent batch stored under `run_name`
    pub async fn latest(&self, run_name: &str) -> Option<Vec<BenchmarkRecord>> {
        let batches = self.batches.lock().await;
        batches
            .iter()
            .rev()
            .find(|b| b.run_name == run_name)
            .map(|b| b.records.clone())
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn store_batch(&self, run_name: &str, records: &[BenchmarkRecord]) -> StorageResult<()> {
        validate_run_name(run_name)?;
        self.batches.lock().await.push(StoredBatch {
            run_name: run_name.to_string(),
            records: records.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_read_back() {
        let store = MemoryResultStore::new();
        let first = vec![BenchmarkRecord::pending("a", "http://node")];
        let second = vec![BenchmarkRecord::pending("b", "http://node")];

        store.store_batch("run", &first).await.unwrap();
        store.store_batch("other", &[]).await.unwrap();
        store.store_batch("run", &second).await.unwrap();

        assert_eq!(store.batches().await.len(), 3);
        assert_eq!(store.latest("run").await, Some(second));
        assert_eq!(store.latest("missing").await, None);
    }

    #[tokio::test]
    async fn test_clones_share_batches() {
        let store = MemoryResultStore::new();
        let handle = store.clone();
        handle.store_batch("shared", &[]).await.unwrap();
        assert_eq!(store.batches().await[0].run_name, "shared");
    }

    #[tokio::test]
    async fn test_rejects_empty_run_name() {
        let store = MemoryResultStore::new();
        assert!(store.store_batch("", &[]).await.is_err());
        assert!(store.batches().await.is_empty());
    }
}
