//! Elliptic Curve Cryptography (ECC) module
//!
//! This module provides the cryptographic primitives of the Labchain transaction
//! protocol: P-256 key pairs, SHA-256 hashing, and ECDSA signatures over SHA-256.
//! Signatures travel as base64 encoded DER, public keys as base64 encoded PEM.

pub mod private_key;
pub mod public_key;
pub mod signature;
pub mod key_utils;
pub mod hash;

// Re-export main types for convenience
pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
pub use key_utils::{key_from_pem, KeyHandle, SigningKeySource, VerifyingKeySource};

// Re-export commonly used functions
pub use hash::{sha256, sha256_hex};

use crate::error::EccResult;

/// Common cryptographic constants
pub mod constants {
    //! Cryptographic constants used throughout the ECC module

    /// Size of a private key scalar in bytes
    pub const PRIVATE_KEY_SIZE: usize = 32;

    /// Size of a compressed SEC1 public key in bytes
    pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;

    /// Upper bound of a DER encoded P-256 signature in bytes
    pub const MAX_DER_SIGNATURE_SIZE: usize = 72;

    /// Size of a hash in bytes (SHA-256)
    pub const HASH_SIZE: usize = 32;
}

/// Generate a fresh P-256 key pair
pub fn generate_key_pair() -> KeyHandle {
    KeyHandle::Private(PrivateKey::generate())
}

/// Sign `payload` with ECDSA over SHA-256 and return the base64 DER signature
pub fn sign(payload: &[u8], private_key: &PrivateKey) -> String {
    private_key.sign(payload).to_base64()
}

/// Check a base64 DER signature over `payload`
///
/// A signature that does not match yields `Ok(false)`; only a signature that
/// is not base64 encoded DER at all is an error.
pub fn verify(payload: &[u8], public_key: &PublicKey, signature: &str) -> EccResult<bool> {
    let signature = Signature::from_base64(signature)?;
    Ok(public_key.verify(payload, &signature))
}
