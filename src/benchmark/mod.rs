//! Concurrent confirmation-latency benchmark
//!
//! A run sends N signed transactions spread over a set of receiver nodes and
//! measures, per transaction, the time from dispatch until its hash first
//! shows up in a block reported by one of those nodes.
//!
//! ```rust,no_run
//! use labchain_bench::benchmark::{BenchmarkConfig, BenchmarkEngine};
//! use labchain_bench::nodes::{ComposerConfig, ComposerDirectory};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let directory = Arc::new(ComposerDirectory::new(ComposerConfig::default())?);
//! let engine = BenchmarkEngine::new(directory, BenchmarkConfig::with_transactions(100));
//! let report = engine.run_on_running_nodes().await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod record;

pub use engine::BenchmarkEngine;
pub use record::{BenchmarkRecord, BenchmarkReport, BenchmarkSummary, RecordOutcome, RunTermination};

use crate::chain::constants::BENCHMARK_PAYLOAD_PREFIX;
use std::time::Duration;

/// Benchmark constants
pub mod constants {
    use std::time::Duration;

    /// Interval between confirmation polls
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

    /// Upper bound on a single run
    pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(300);

    /// Run name used when none is given
    pub const DEFAULT_RUN_NAME: &str = "benchmark";
}

/// Settings of one benchmark run
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of transactions to send in total
    pub transactions: usize,
    /// Interval between confirmation polls
    pub poll_interval: Duration,
    /// Give up on still-pending transactions after this long; `None` waits forever
    pub run_timeout: Option<Duration>,
    /// Payload text; each transaction appends its index
    pub payload_prefix: String,
    /// Name the results are stored under
    pub run_name: String,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            transactions: 10,
            poll_interval: constants::DEFAULT_POLL_INTERVAL,
            run_timeout: Some(constants::DEFAULT_RUN_TIMEOUT),
            payload_prefix: BENCHMARK_PAYLOAD_PREFIX.to_string(),
            run_name: constants::DEFAULT_RUN_NAME.to_string(),
        }
    }
}

impl BenchmarkConfig {
    /// Defaults with a transaction count
    pub fn with_transactions(transactions: usize) -> Self {
        Self {
            transactions,
            ..Default::default()
        }
    }

    /// Payload of the transaction with global index `index`
    pub fn payload_for(&self, index: usize) -> String {
        format!("{} #{}", self.payload_prefix, index)
    }
}

/// Split `total` transactions over `receivers` targets
///
/// Every target gets `ceil(total / receivers)` until the total runs out, so
/// 10 over 3 yields `[4, 4, 2]`. Zero receivers count as one.
pub fn partition(total: usize, receivers: usize) -> Vec<usize> {
    let receivers = receivers.max(1);
    let chunk = total.div_ceil(receivers);

    let mut remaining = total;
    (0..receivers)
        .map(|_| {
            let count = chunk.min(remaining);
            remaining -= count;
            count
        })
        .collect()
}
