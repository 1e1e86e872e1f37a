//! Benchmark result stores
//!
//! A finished run hands its records to a [`ResultStore`] together with the
//! run name. Three backends are provided:
//! - **Memory** - keeps batches in process, mostly for tests
//! - **Local filesystem** - one JSON document per run
//! - **Composer** - POSTs the batch to the composer's `watchTransactions` endpoint
//!
//! # Examples
//!
//! ```rust,no_run
//! use labchain_bench::storage::{FileResultStore, FileStoreConfig, ResultStore};
//! use std::path::PathBuf;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileResultStore::new(FileStoreConfig {
//!     base_path: PathBuf::from("./benchmarks"),
//!     ..Default::default()
//! })?;
//! store.store_batch("smoke", &[]).await?;
//! # Ok(())
//! # }
//! ```

pub mod composer;
pub mod local;
pub mod memory;

pub use composer::ComposerResultStore;
pub use local::{FileResultStore, FileStoreConfig};
pub use memory::{MemoryResultStore, StoredBatch};

use crate::benchmark::BenchmarkRecord;
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;

/// Storage constants
pub mod constants {
    /// Maximum run name length
    pub const MAX_RUN_NAME_LENGTH: usize = 255;

    /// Extension of stored run files
    pub const RESULT_FILE_EXTENSION: &str = "json";
}

/// Sink for the records of a finished run
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Persist `records` under `run_name`
    async fn store_batch(&self, run_name: &str, records: &[BenchmarkRecord]) -> StorageResult<()>;
}

/// Reject run names that cannot serve as a file name or batch key
pub fn validate_run_name(run_name: &str) -> StorageResult<()> {
    if run_name.trim().is_empty() {
        return Err(StorageError::OperationFailed {
            operation: "validate_run_name".to_string(),
            reason: "Run name cannot be empty".to_string(),
        });
    }

    if run_name.len() > constants::MAX_RUN_NAME_LENGTH {
        return Err(StorageError::OperationFailed {
            operation: "validate_run_name".to_string(),
            reason: format!("Run name too long (max {} characters)", constants::MAX_RUN_NAME_LENGTH),
        });
    }

    if run_name.chars().any(|c| matches!(c, '/' | '\\' | '\0' | '\n' | '\r')) || run_name == ".." {
        return Err(StorageError::OperationFailed {
            operation: "validate_run_name".to_string(),
            reason: "Run name contains invalid characters".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_run_name() {
        assert!(validate_run_name("burst-100").is_ok());
        assert!(validate_run_name("  ").is_err());
        assert!(validate_run_name("../etc").is_err());
        assert!(validate_run_name("a\nb").is_err());
        assert!(validate_run_name(&"x".repeat(constants::MAX_RUN_NAME_LENGTH + 1)).is_err());
    }
}
