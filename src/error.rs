//! Error types for the Labchain benchmark library
//!
//! This module provides a unified error handling system using `thiserror` for
//! all components of the library. A forged or mismatched signature is not an
//! error: verification reports it as `Ok(false)`.

use thiserror::Error;

/// The main error type for the Labchain benchmark library
#[derive(Error, Debug)]
pub enum Error {
    /// ECC (Elliptic Curve Cryptography) related errors
    #[error("ECC error: {0}")]
    Ecc(#[from] EccError),

    /// Transaction and block errors
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    /// Node transport errors
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Result store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Benchmark run errors
    #[error("Benchmark error: {0}")]
    Benchmark(#[from] BenchmarkError),
}

/// ECC-specific error types
///
/// Only structurally malformed input ends up here.
#[derive(Error, Debug)]
pub enum EccError {
    /// Invalid private key
    #[error("Invalid private key: {reason}")]
    InvalidPrivateKey { reason: String },

    /// Invalid public key
    #[error("Invalid public key: {reason}")]
    InvalidPublicKey { reason: String },

    /// Invalid signature encoding
    #[error("Invalid signature: {reason}")]
    InvalidSignature { reason: String },

    /// Cryptographic operation failed
    #[error("Cryptographic operation failed: {operation}")]
    CryptoOperationFailed { operation: String },
}

/// Chain-specific error types
#[derive(Error, Debug)]
pub enum ChainError {
    /// Verification was attempted on a transaction that carries no signature
    #[error("Transaction has no signature to verify")]
    MissingSignature,

    /// Invalid transaction
    #[error("Invalid transaction: {reason}")]
    InvalidTransaction { reason: String },

    /// Invalid block
    #[error("Invalid block: {reason}")]
    InvalidBlock { reason: String },

    /// Key material could not be used
    #[error(transparent)]
    Ecc(#[from] EccError),
}

/// Network-specific error types
#[derive(Error, Debug)]
pub enum NetworkError {
    /// A client was configured without a usable endpoint
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// Connection or request failure
    #[error("Transport failure: {reason}")]
    Transport { reason: String },

    /// Request timed out
    #[error("Connection timeout")]
    Timeout,

    /// Invalid URL
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// HTTP error
    #[error("HTTP error: {status}: {message}")]
    HttpError { status: u16, message: String },

    /// The response was not JSON or lacked the `result` member
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Payload of a response could not be turned into chain types
    #[error("Invalid payload: {0}")]
    Payload(#[from] ChainError),
}

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Storage operation failed
    #[error("Storage operation failed: {operation}: {reason}")]
    OperationFailed { operation: String, reason: String },

    /// Resource not found
    #[error("Resource not found: {resource}")]
    ResourceNotFound { resource: String },

    /// Records could not be encoded
    #[error("Serialization failed: {reason}")]
    Serialization { reason: String },

    /// Remote store could not be reached
    #[error("Connection error: {0}")]
    Connection(#[from] NetworkError),
}

/// Benchmark-specific error types
#[derive(Error, Debug)]
pub enum BenchmarkError {
    /// Run settings cannot be used
    #[error("Invalid benchmark configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Discovery found no running node to send to
    #[error("No running receiver nodes")]
    NoReceivers,

    /// A receiver node could not be resolved to a client
    #[error("Node directory failure: {0}")]
    Directory(#[from] NetworkError),

    /// Building or signing a benchmark transaction failed
    #[error("Transaction generation failed: {0}")]
    Generation(#[from] ChainError),

    /// Handing the records to the result store failed
    #[error("Result hand-off failed: {0}")]
    Store(#[from] StorageError),
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience type alias for ECC Results
pub type EccResult<T> = std::result::Result<T, EccError>;

/// Convenience type alias for Chain Results
pub type ChainResult<T> = std::result::Result<T, ChainError>;

/// Convenience type alias for Network Results
pub type NetworkResult<T> = std::result::Result<T, NetworkError>;

/// Convenience type alias for Storage Results
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Convenience type alias for Benchmark Results
pub type BenchmarkResult<T> = std::result::Result<T, BenchmarkError>;
