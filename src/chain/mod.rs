//! Chain module for the Labchain transaction protocol
//!
//! This module provides accounts, transaction parties, the transaction signing
//! state machine and the blocks a node reports back.

pub mod account;
pub mod identity;
pub mod transaction;
pub mod block;

// Re-export main types for convenience
pub use account::Account;
pub use identity::Identity;
pub use transaction::{Transaction, TransmittableTransaction};
pub use block::{Block, RawBlock};

/// Common protocol constants
pub mod constants {
    //! Constants used throughout the chain module

    /// Payload prefix of generated benchmark transactions
    pub const BENCHMARK_PAYLOAD_PREFIX: &str = "This is a very important payload";
}
