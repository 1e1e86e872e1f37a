//! Per-transaction records and run reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// What became of a dispatched transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// Sent, not yet seen in a block
    Pending,
    /// Seen in a block
    Confirmed,
    /// The node rejected the send or could not be reached
    Failed {
        /// Transport error text
        reason: String,
    },
    /// Still pending when the run timed out
    TimedOut,
}

/// One dispatched transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Transaction hash
    pub transaction_hash: String,
    /// URL of the node the transaction was sent to
    pub receiver: String,
    /// Dispatch time
    pub start_time: DateTime<Utc>,
    /// Timestamp of the first block that contained the transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Current state
    #[serde(flatten)]
    pub outcome: RecordOutcome,
}

impl BenchmarkRecord {
    /// Fresh pending record started now
    pub fn pending(transaction_hash: impl Into<String>, receiver: impl Into<String>) -> Self {
        Self {
            transaction_hash: transaction_hash.into(),
            receiver: receiver.into(),
            start_time: Utc::now(),
            end_time: None,
            outcome: RecordOutcome::Pending,
        }
    }

    /// Stamp the confirmation time
    pub fn confirm(&mut self, at: DateTime<Utc>) {
        self.end_time = Some(at);
        self.outcome = RecordOutcome::Confirmed;
    }

    /// Mark the send as failed
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.outcome = RecordOutcome::Failed { reason: reason.into() };
    }

    /// Whether the record still waits for a block
    pub fn is_pending(&self) -> bool {
        self.outcome == RecordOutcome::Pending
    }

    /// Confirmation latency
    ///
    /// Block timestamps come from the node clock, so the difference is taken
    /// as an absolute value.
    pub fn latency(&self) -> Option<Duration> {
        let end = self.end_time?;
        (end - self.start_time).abs().to_std().ok()
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunTermination {
    /// Every transaction was confirmed or failed
    Completed,
    /// The run timeout elapsed with transactions still pending
    TimedOut,
    /// The run was cancelled from outside
    Cancelled,
}

/// Result of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Unique id of the run
    pub run_id: Uuid,
    /// Name the results are stored under
    pub run_name: String,
    /// When the first transaction was generated
    pub started_at: DateTime<Utc>,
    /// When the run stopped waiting
    pub finished_at: DateTime<Utc>,
    /// Why the run stopped
    pub termination: RunTermination,
    /// One record per dispatched transaction, in dispatch order
    pub records: Vec<BenchmarkRecord>,
}

impl BenchmarkReport {
    /// Counts and latency statistics
    pub fn summary(&self) -> BenchmarkSummary {
        BenchmarkSummary::from_records(&self.records)
    }

    /// Records that made it into a block
    pub fn confirmed(&self) -> impl Iterator<Item = &BenchmarkRecord> {
        self.records.iter().filter(|r| r.outcome == RecordOutcome::Confirmed)
    }
}

/// Aggregate view over a set of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchmarkSummary {
    /// All records
    pub total: usize,
    /// Confirmed records
    pub confirmed: usize,
    /// Failed sends
    pub failed: usize,
    /// Records given up on at timeout
    pub timed_out: usize,
    /// Records left pending, only after cancellation
    pub pending: usize,
    /// Mean confirmation latency
    pub average: Option<Duration>,
    /// Fastest confirmation
    pub min: Option<Duration>,
    /// Slowest confirmation
    pub max: Option<Duration>,
}

impl BenchmarkSummary {
    /// Summarize `records`
    pub fn from_records(records: &[BenchmarkRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Default::default()
        };

        let mut latencies = Vec::with_capacity(records.len());
        for record in records {
            match record.outcome {
                RecordOutcome::Pending => summary.pending += 1,
                RecordOutcome::Confirmed => summary.confirmed += 1,
                RecordOutcome::Failed { .. } => summary.failed += 1,
                RecordOutcome::TimedOut => summary.timed_out += 1,
            }
            latencies.extend(record.latency());
        }

        if !latencies.is_empty() {
            let sum: Duration = latencies.iter().sum();
            summary.average = Some(sum / latencies.len() as u32);
            summary.min = latencies.iter().min().copied();
            summary.max = latencies.iter().max().copied();
        }
        summary
    }
}

impl fmt::Display for BenchmarkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} transactions: {} confirmed, {} failed, {} timed out, {} pending",
            self.total, self.confirmed, self.failed, self.timed_out, self.pending
        )?;
        if let (Some(avg), Some(min), Some(max)) = (self.average, self.min, self.max) {
            write!(f, "; latency avg {:?}, min {:?}, max {:?}", avg, min, max)?;
        }
        Ok(())
    }
}
