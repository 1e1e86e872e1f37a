//! Labchain latency benchmark CLI
//!
//! Sends a burst of signed transactions to a set of nodes and reports how long
//! each took to be mined.
//!
//! # Example
//!
//! ```bash
//! # Discover running nodes through the composer and store results there
//! labbench --composer-url http://localhost:8080 -n 200 --store-composer
//!
//! # Talk to two nodes directly and write the records to ./runs
//! labbench --node-url http://172.18.0.2:8080 --node-url http://172.18.0.3:8080 --output-dir runs
//! ```

use clap::Parser;
use color_eyre::eyre::{bail, Result};
use labchain_bench::benchmark::{BenchmarkConfig, BenchmarkEngine};
use labchain_bench::nodes::{ComposerConfig, ComposerDirectory, NodeDescriptor, NodeDirectory, StaticDirectory};
use labchain_bench::rpc::{ClientConfig, LabchainClient};
use labchain_bench::storage::{ComposerResultStore, FileResultStore, FileStoreConfig, ResultStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Labchain latency benchmark
#[derive(Parser, Debug)]
#[command(name = "labbench")]
#[command(version, about, long_about = None)]
struct Args {
    /// Composer base URL used to discover running nodes
    #[arg(long, default_value = "http://localhost:8080")]
    composer_url: String,

    /// Node endpoint to send to; repeat for several nodes. Skips discovery.
    #[arg(long = "node-url")]
    node_urls: Vec<String>,

    /// Node used when discovery finds nothing
    #[arg(long, default_value = "http://localhost:8082")]
    fallback_url: String,

    /// Number of transactions to send
    #[arg(short = 'n', long, default_value = "10")]
    transactions: usize,

    /// Interval between block polls in milliseconds
    #[arg(long, default_value = "500", value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval_ms: u64,

    /// Give up on unconfirmed transactions after this many seconds; 0 waits forever
    #[arg(long, default_value = "300")]
    timeout_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    request_timeout_secs: u64,

    /// Name the results are stored under
    #[arg(long, default_value = "benchmark")]
    run_name: String,

    /// Write the records as JSON into this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Hand the records to the composer's watchTransactions endpoint
    #[arg(long)]
    store_composer: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,labchain_bench=info,labbench=info")),
        )
        .init();

    let args = Args::parse();
    if args.transactions == 0 {
        bail!("nothing to do: --transactions must be at least 1");
    }
    let request_timeout = Duration::from_secs(args.request_timeout_secs);
    let composer = ComposerConfig {
        base_url: args.composer_url.clone(),
        request_timeout,
        fallback_url: Some(args.fallback_url.clone()),
    };

    let (directory, receivers): (Arc<dyn NodeDirectory>, Vec<NodeDescriptor>) = if args.node_urls.is_empty() {
        let directory = ComposerDirectory::new(composer.clone())?;
        let receivers = directory.running_nodes().await?;
        if receivers.is_empty() {
            warn!(fallback = %args.fallback_url, "No running nodes found, using fallback node");
        }
        (Arc::new(directory), receivers)
    } else {
        let mut directory = StaticDirectory::new();
        for url in &args.node_urls {
            let client = LabchainClient::new(ClientConfig {
                url: url.clone(),
                request_timeout,
            })?;
            directory = directory.with_node(NodeDescriptor::named(url.as_str()), Arc::new(client));
        }
        let receivers = directory.nodes().to_vec();
        (Arc::new(directory), receivers)
    };

    let mut stores: Vec<Box<dyn ResultStore>> = Vec::new();
    if let Some(base_path) = args.output_dir {
        stores.push(Box::new(FileResultStore::new(FileStoreConfig {
            base_path,
            ..Default::default()
        })?));
    }
    if args.store_composer {
        stores.push(Box::new(ComposerResultStore::new(&composer)?));
    }

    let config = BenchmarkConfig {
        transactions: args.transactions,
        poll_interval: Duration::from_millis(args.poll_interval_ms),
        run_timeout: (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs)),
        run_name: args.run_name,
        ..Default::default()
    };
    let engine = BenchmarkEngine::new(directory, config);

    let token = CancellationToken::new();
    let shutdown = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    let report = engine.run_with_cancellation(&receivers, token).await?;
    for store in &stores {
        store.store_batch(&report.run_name, &report.records).await?;
    }

    let summary = report.summary();
    info!(run = %report.run_name, run_id = %report.run_id, termination = ?report.termination, "{}", summary);
    Ok(())
}
