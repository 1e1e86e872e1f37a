//! Hash functions for cryptographic operations

use crate::ecc::constants::HASH_SIZE;
use sha2::{Digest, Sha256};

/// SHA-256 hash function
pub fn sha256(data: &[u8]) -> [u8; HASH_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 hash function returning the lowercase hex digest
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}
