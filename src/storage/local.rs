//! Local filesystem result store
//!
//! Each batch becomes one JSON array written to
//! `<base_path>/<run_name>_<timestamp>.json`. Writes go to a temporary file
//! first and are renamed into place.

use crate::benchmark::BenchmarkRecord;
use crate::error::{StorageError, StorageResult};
use crate::storage::{constants, validate_run_name, ResultStore};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// File store configuration
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Directory the run files are written to
    pub base_path: PathBuf,
    /// Create the directory if it doesn't exist
    pub create_dirs: bool,
    /// Pretty-print the JSON documents
    pub pretty: bool,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./benchmarks"),
            create_dirs: true,
            pretty: false,
        }
    }
}

/// Writes every batch to its own JSON file
#[derive(Debug, Clone)]
pub struct FileResultStore {
    config: FileStoreConfig,
}

impl FileResultStore {
    /// Create a store, creating the base directory when allowed
    pub fn new(config: FileStoreConfig) -> StorageResult<Self> {
        if config.create_dirs && !config.base_path.exists() {
            std::fs::create_dir_all(&config.base_path).map_err(|e| StorageError::OperationFailed {
                operation: "create_base_directory".to_string(),
                reason: format!("Failed to create base directory: {}", e),
            })?;
        }

        if !config.base_path.exists() {
            return Err(StorageError::OperationFailed {
                operation: "verify_base_directory".to_string(),
                reason: "Base directory does not exist and create_dirs is disabled".to_string(),
            });
        }

        if !config.base_path.is_dir() {
            return Err(StorageError::OperationFailed {
                operation: "verify_base_directory".to_string(),
                reason: "Base path exists but is not a directory".to_string(),
            });
        }

        Ok(Self { config })
    }

    /// Directory the run files go to
    pub fn base_path(&self) -> &Path {
        &self.config.base_path
    }

    /// Path a batch stored right now under `run_name` would get
    pub fn path_for(&self, run_name: &str) -> PathBuf {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%S%.6fZ");
        self.config
            .base_path
            .join(format!("{}_{}.{}", run_name, timestamp, constants::RESULT_FILE_EXTENSION))
    }

    /// Read a stored batch back
    pub async fn load(path: &Path) -> StorageResult<Vec<BenchmarkRecord>> {
        let data = fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::ResourceNotFound {
                resource: path.display().to_string(),
            },
            _ => StorageError::OperationFailed {
                operation: "read_file".to_string(),
                reason: format!("Failed to read {}: {}", path.display(), e),
            },
        })?;

        serde_json::from_slice(&data).map_err(|e| StorageError::Serialization {
            reason: format!("Failed to decode {}: {}", path.display(), e),
        })
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        let temp_path = path.with_extension("tmp");

        fs::write(&temp_path, data).await.map_err(|e| StorageError::OperationFailed {
            operation: "create_temp_file".to_string(),
            reason: format!("Failed to write temporary file: {}", e),
        })?;

        fs::rename(&temp_path, path).await.map_err(|e| StorageError::OperationFailed {
            operation: "atomic_rename".to_string(),
            reason: format!("Failed to rename temporary file: {}", e),
        })
    }
}

#[async_trait]
impl ResultStore for FileResultStore {
    async fn store_batch(&self, run_name: &str, records: &[BenchmarkRecord]) -> StorageResult<()> {
        validate_run_name(run_name)?;

        let data = if self.config.pretty {
            serde_json::to_vec_pretty(records)
        } else {
            serde_json::to_vec(records)
        }
        .map_err(|e| StorageError::Serialization { reason: e.to_string() })?;

        let path = self.path_for(run_name);
        self.write_file(&path, &data).await?;
        info!(path = %path.display(), records = records.len(), "Wrote benchmark records");
        Ok(())
    }
}
