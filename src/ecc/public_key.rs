//! Public key implementation for ECC operations

use crate::ecc::Signature;
use crate::error::{EccError, EccResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use p256::ecdsa::signature::Verifier;
use p256::ecdsa::VerifyingKey;
use p256::pkcs8::{DecodePublicKey, EncodePublicKey, LineEnding};

/// A P-256 public key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey {
    key: VerifyingKey,
}

impl PublicKey {
    pub(crate) fn from_verifying_key(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Create a public key from SEC1 encoded point bytes
    pub fn from_sec1_bytes(bytes: &[u8]) -> EccResult<Self> {
        let key = VerifyingKey::from_sec1_bytes(bytes).map_err(|e| EccError::InvalidPublicKey {
            reason: format!("Invalid public key data: {}", e),
        })?;
        Ok(Self { key })
    }

    /// Parse an SPKI (`PUBLIC KEY`) PEM document
    pub fn from_pem(pem: &str) -> EccResult<Self> {
        let key = VerifyingKey::from_public_key_pem(pem.trim()).map_err(|e| EccError::InvalidPublicKey {
            reason: format!("Invalid public key PEM: {}", e),
        })?;
        Ok(Self { key })
    }

    /// Parse a base64 wrapped SPKI PEM document, the form used on the wire
    pub fn from_pem_base64(encoded: &str) -> EccResult<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| EccError::InvalidPublicKey {
                reason: format!("Invalid base64: {}", e),
            })?;
        let pem = String::from_utf8(bytes).map_err(|e| EccError::InvalidPublicKey {
            reason: format!("PEM is not UTF-8: {}", e),
        })?;
        Self::from_pem(&pem)
    }

    /// Export as SPKI PEM
    pub fn to_pem(&self) -> EccResult<String> {
        self.key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| EccError::CryptoOperationFailed {
                operation: format!("SPKI export failed: {}", e),
            })
    }

    /// Export as base64 encoded SPKI PEM
    pub fn to_pem_base64(&self) -> EccResult<String> {
        Ok(STANDARD.encode(self.to_pem()?))
    }

    /// Convert to compressed SEC1 bytes
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        self.key.to_encoded_point(true).as_bytes().to_vec()
    }

    /// Convert to hex string (compressed)
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_sec1_bytes())
    }

    /// Verify an ECDSA/SHA-256 signature over `message`
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.key.verify(message, signature.inner()).is_ok()
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecc::PrivateKey;

    #[test]
    fn test_pem_export_is_stable() {
        let public_key = PrivateKey::generate().public_key();
        let first = public_key.to_pem_base64().unwrap();
        let second = public_key.to_pem_base64().unwrap();
        assert_eq!(first, second);

        let pem = public_key.to_pem().unwrap();
        assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----"));
    }

    #[test]
    fn test_pem_base64_roundtrip() {
        let public_key = PrivateKey::generate().public_key();
        let encoded = public_key.to_pem_base64().unwrap();
        let recovered = PublicKey::from_pem_base64(&encoded).unwrap();
        assert_eq!(public_key, recovered);
    }

    #[test]
    fn test_sec1_roundtrip() {
        let public_key = PrivateKey::generate().public_key();
        let bytes = public_key.to_sec1_bytes();
        assert_eq!(bytes.len(), crate::ecc::constants::COMPRESSED_PUBLIC_KEY_SIZE);
        assert_eq!(PublicKey::from_sec1_bytes(&bytes).unwrap(), public_key);
    }

    #[test]
    fn test_signature_verification() {
        let private_key = PrivateKey::generate();
        let public_key = private_key.public_key();

        let message = b"Hello, Labchain!";
        let signature = private_key.sign(message);
        assert!(public_key.verify(message, &signature));
        assert!(!public_key.verify(b"Hello, Labchain?", &signature));
    }

    #[test]
    fn test_invalid_pem() {
        assert!(PublicKey::from_pem("garbage").is_err());
        assert!(PublicKey::from_pem_base64("%%%").is_err());
    }
}
