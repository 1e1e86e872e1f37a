//! Private key implementation for ECC operations

use crate::ecc::constants::PRIVATE_KEY_SIZE;
use crate::ecc::{PublicKey, Signature};
use crate::error::{EccError, EccResult};
use p256::ecdsa::signature::Signer;
use p256::ecdsa::SigningKey;
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey, LineEnding};
use rand_core::OsRng;
use zeroize::Zeroizing;

/// A P-256 private key
#[derive(Clone)]
pub struct PrivateKey {
    key: SigningKey,
}

impl PrivateKey {
    /// Generate a new random private key from OS entropy
    pub fn generate() -> Self {
        Self {
            key: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a private key from a 32 byte big-endian scalar
    pub fn from_bytes(bytes: &[u8]) -> EccResult<Self> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(EccError::InvalidPrivateKey {
                reason: format!("Expected {} bytes, got {}", PRIVATE_KEY_SIZE, bytes.len()),
            });
        }
        let key = SigningKey::from_slice(bytes).map_err(|e| EccError::InvalidPrivateKey {
            reason: format!("Invalid key data: {}", e),
        })?;
        Ok(Self { key })
    }

    /// Parse a PEM private key, either PKCS#8 (`PRIVATE KEY`) or SEC1 (`EC PRIVATE KEY`)
    pub fn from_pem(pem: &str) -> EccResult<Self> {
        let pem = pem.trim();
        if pem.contains("BEGIN EC PRIVATE KEY") {
            let secret = p256::SecretKey::from_sec1_pem(pem).map_err(|e| EccError::InvalidPrivateKey {
                reason: format!("Invalid SEC1 PEM: {}", e),
            })?;
            return Ok(Self {
                key: SigningKey::from(secret),
            });
        }

        let key = SigningKey::from_pkcs8_pem(pem).map_err(|e| EccError::InvalidPrivateKey {
            reason: format!("Invalid PKCS#8 PEM: {}", e),
        })?;
        Ok(Self { key })
    }

    /// Export as PKCS#8 PEM
    pub fn to_pem(&self) -> EccResult<Zeroizing<String>> {
        self.key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| EccError::CryptoOperationFailed {
                operation: format!("PKCS#8 export failed: {}", e),
            })
    }

    /// Get the corresponding public key
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(*self.key.verifying_key())
    }

    /// Sign a message with ECDSA over SHA-256
    ///
    /// The message is hashed internally, so callers pass the raw bytes.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::from_inner(self.key.sign(message))
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
