//! Benchmark run orchestration
//!
//! One task per receiver fires its share of transactions concurrently, one
//! poller task fetches the latest blocks from every receiver on a fixed
//! interval, and the run itself is the single consumer of the events both
//! produce. Only the consumer touches the pending set.

use crate::benchmark::record::{BenchmarkRecord, BenchmarkReport, RecordOutcome, RunTermination};
use crate::benchmark::{partition, BenchmarkConfig};
use crate::chain::{Account, Transaction};
use crate::error::{BenchmarkError, BenchmarkResult};
use crate::nodes::{NodeDescriptor, NodeDirectory};
use crate::rpc::NodeRpc;
use crate::storage::ResultStore;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// Something the consumer has to act on
#[derive(Debug)]
enum RunEvent {
    /// The transaction is about to go out
    Dispatched { hash: String, at: DateTime<Utc> },
    /// A send was rejected; the transaction will never be confirmed
    SendFailed { hash: String, reason: String },
    /// A block with these transactions was reported
    Mined { at: DateTime<Utc>, hashes: Vec<String> },
}

/// Transactions bound for one receiver
struct Dispatch {
    client: Arc<dyn NodeRpc>,
    transactions: Vec<(String, Transaction)>,
}

/// Drives benchmark runs against nodes resolved through a [`NodeDirectory`]
pub struct BenchmarkEngine {
    directory: Arc<dyn NodeDirectory>,
    config: BenchmarkConfig,
}

impl BenchmarkEngine {
    /// Engine using `directory` to reach nodes
    pub fn new(directory: Arc<dyn NodeDirectory>, config: BenchmarkConfig) -> Self {
        Self { directory, config }
    }

    /// Run settings
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Benchmark every node the directory reports as running
    pub async fn run_on_running_nodes(&self) -> BenchmarkResult<BenchmarkReport> {
        let nodes = self.directory.running_nodes().await?;
        if nodes.is_empty() {
            return Err(BenchmarkError::NoReceivers);
        }
        self.run(&nodes).await
    }

    /// Run against `receivers`; an empty slice targets the directory's fallback node
    pub async fn run(&self, receivers: &[NodeDescriptor]) -> BenchmarkResult<BenchmarkReport> {
        self.run_with_cancellation(receivers, CancellationToken::new()).await
    }

    /// Run and hand the records to `store` under the configured run name
    pub async fn run_and_store(
        &self,
        receivers: &[NodeDescriptor],
        store: &dyn ResultStore,
    ) -> BenchmarkResult<BenchmarkReport> {
        let report = self.run(receivers).await?;
        store.store_batch(&report.run_name, &report.records).await?;
        info!(run = %report.run_name, records = report.records.len(), "Stored benchmark records");
        Ok(report)
    }

    /// Run until every transaction is settled, the timeout passes, or `cancel` fires
    ///
    /// Transactions still pending at timeout are marked timed out; after
    /// cancellation they are left pending.
    pub async fn run_with_cancellation(
        &self,
        receivers: &[NodeDescriptor],
        cancel: CancellationToken,
    ) -> BenchmarkResult<BenchmarkReport> {
        if self.config.poll_interval.is_zero() {
            return Err(BenchmarkError::InvalidConfig {
                reason: "poll interval must be greater than zero".to_string(),
            });
        }
        let clients = self.resolve_clients(receivers)?;
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            run = %self.config.run_name,
            %run_id,
            transactions = self.config.transactions,
            receivers = clients.len(),
            "Starting benchmark"
        );

        // Ephemeral parties shared by every transaction of the run
        let sender = Account::generate()?;
        let receiver = Account::generate()?;

        let counts = partition(self.config.transactions, clients.len());
        let mut records = Vec::with_capacity(self.config.transactions);
        let mut pending: HashMap<String, usize> = HashMap::with_capacity(self.config.transactions);
        let mut dispatches = Vec::with_capacity(clients.len());
        let mut index = 0;

        for (client, count) in clients.iter().zip(counts) {
            let mut transactions = Vec::with_capacity(count);
            for _ in 0..count {
                let mut transaction = Transaction::new(&sender, &receiver, self.config.payload_for(index));
                transaction.sign(&sender)?;
                let hash = transaction.hash();

                pending.insert(hash.clone(), records.len());
                records.push(BenchmarkRecord::pending(hash.clone(), client.url()));
                transactions.push((hash, transaction));
                index += 1;
            }
            dispatches.push(Dispatch {
                client: client.clone(),
                transactions,
            });
        }

        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let mut tasks: Vec<JoinHandle<()>> = dispatches
            .into_iter()
            .filter(|d| !d.transactions.is_empty())
            .map(|d| tokio::spawn(dispatch(d, events_tx.clone())))
            .collect();
        if !pending.is_empty() {
            tasks.push(tokio::spawn(poll_blocks(clients, self.config.poll_interval, events_tx)));
        } else {
            drop(events_tx);
        }

        let deadline = self.config.run_timeout.map(|timeout| Instant::now() + timeout);
        let timeout = sleep_until(deadline);
        tokio::pin!(timeout);

        let termination = loop {
            if pending.is_empty() {
                break RunTermination::Completed;
            }

            tokio::select! {
                _ = cancel.cancelled() => break RunTermination::Cancelled,
                _ = &mut timeout => break RunTermination::TimedOut,
                event = events_rx.recv() => match event {
                    Some(RunEvent::Dispatched { hash, at }) => {
                        if let Some(&position) = pending.get(&hash) {
                            records[position].start_time = at;
                        }
                    }
                    Some(RunEvent::SendFailed { hash, reason }) => {
                        if let Some(position) = pending.remove(&hash) {
                            records[position].fail(reason);
                        }
                    }
                    Some(RunEvent::Mined { at, hashes }) => {
                        for hash in hashes {
                            // first block wins when the same transaction sits on several forks
                            if let Some(position) = pending.remove(&hash) {
                                records[position].confirm(at);
                                debug!(hash = %hash, latency = ?records[position].latency(), "Transaction confirmed");
                            }
                        }
                    }
                    None => {
                        warn!(pending = pending.len(), "Event sources stopped before the run settled");
                        break RunTermination::Cancelled;
                    }
                },
            }
        };

        for task in &tasks {
            task.abort();
        }

        if termination == RunTermination::TimedOut {
            for position in pending.into_values() {
                records[position].outcome = RecordOutcome::TimedOut;
            }
        }

        let report = BenchmarkReport {
            run_id,
            run_name: self.config.run_name.clone(),
            started_at,
            finished_at: Utc::now(),
            termination,
            records,
        };
        let summary = report.summary();
        info!(
            run = %report.run_name,
            %run_id,
            termination = ?termination,
            confirmed = summary.confirmed,
            failed = summary.failed,
            timed_out = summary.timed_out,
            average = ?summary.average,
            "Benchmark finished"
        );
        Ok(report)
    }

    fn resolve_clients(&self, receivers: &[NodeDescriptor]) -> BenchmarkResult<Vec<Arc<dyn NodeRpc>>> {
        if receivers.is_empty() {
            return Ok(vec![self.directory.fallback_client()?]);
        }
        receivers
            .iter()
            .map(|node| self.directory.client_for(node).map_err(BenchmarkError::from))
            .collect()
    }
}

impl std::fmt::Debug for BenchmarkEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkEngine").field("config", &self.config).finish_non_exhaustive()
    }
}

/// Fire every transaction of one receiver without waiting between sends
async fn dispatch(batch: Dispatch, events: mpsc::UnboundedSender<RunEvent>) {
    let client = batch.client;
    let sends = batch.transactions.into_iter().map(|(hash, transaction)| {
        let client = client.clone();
        let events = events.clone();
        async move {
            // sent ahead of the request so it is queued before any block carrying the hash
            let _ = events.send(RunEvent::Dispatched {
                hash: hash.clone(),
                at: Utc::now(),
            });
            match client.send_transaction(&transaction).await {
                Ok(ack) => trace!(hash = %hash, ?ack, "Transaction accepted"),
                Err(e) => {
                    warn!(hash = %hash, node = client.url(), error = %e, "Failed to send transaction");
                    let _ = events.send(RunEvent::SendFailed {
                        hash,
                        reason: e.to_string(),
                    });
                }
            }
        }
    });
    join_all(sends).await;
}

/// Report the latest blocks of every client once per interval
async fn poll_blocks(
    clients: Vec<Arc<dyn NodeRpc>>,
    interval: std::time::Duration,
    events: mpsc::UnboundedSender<RunEvent>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let results = join_all(clients.iter().map(|client| client.get_block(None))).await;
        for (client, result) in clients.iter().zip(results) {
            match result {
                Ok(blocks) => {
                    for block in blocks {
                        let hashes: Vec<String> = block.transaction_hashes().collect();
                        if hashes.is_empty() {
                            continue;
                        }
                        if events.send(RunEvent::Mined { at: block.timestamp, hashes }).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => debug!(node = client.url(), error = %e, "Block poll failed"),
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
