//! # Labchain Bench
//!
//! Client side of the Labchain transaction protocol plus a concurrent
//! mining-latency benchmark: sign transactions, submit them to nodes over
//! JSON-RPC, and measure how long each one takes to show up in a block.
//!
//! ## Modules
//!
//! - **ECC Module**: P-256 key pairs, SHA-256 hashing and ECDSA signatures
//! - **Chain Module**: accounts, transactions and the blocks nodes report
//! - **RPC Module**: JSON-RPC 2.0 client bound to a single node
//! - **Benchmark Module**: the latency benchmark engine and its records
//! - **Nodes Module**: node discovery, statically or through the composer
//! - **Storage Module**: where finished runs are handed off to
//!
//! ## Optional Features
//!
//! - `cli`: the `labbench` command line driver (on by default)
//!
//! ## Example
//!
//! ```rust
//! use labchain_bench::chain::{Account, Transaction};
//!
//! let sender = Account::generate()?;
//! let receiver = Account::generate()?;
//!
//! let mut tx = Transaction::new(&sender, &receiver, "hello-0");
//! sender.sign_transaction(&mut tx)?;
//! assert!(tx.verify(&sender, None)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export core error types
pub use error::{Error, Result};

// Core modules
pub mod error;
pub mod ecc;
pub mod chain;
pub mod rpc;
pub mod benchmark;
pub mod nodes;
pub mod storage;

// Re-export commonly used types
pub mod prelude {
    //! Common types and traits for convenient importing

    pub use crate::benchmark::{BenchmarkConfig, BenchmarkEngine, BenchmarkRecord, BenchmarkReport};
    pub use crate::chain::{Account, Block, Identity, Transaction};
    pub use crate::ecc::{KeyHandle, PrivateKey, PublicKey, Signature, SigningKeySource, VerifyingKeySource};
    pub use crate::error::{Error, Result};
    pub use crate::nodes::{NodeDescriptor, NodeDirectory};
    pub use crate::rpc::{ClientConfig, LabchainClient, NodeRpc};
    pub use crate::storage::ResultStore;
}

// Version information
/// The version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
