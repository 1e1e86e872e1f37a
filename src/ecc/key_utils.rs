//! Key handles and key normalization
//!
//! Transactions accept several kinds of key material for signing and
//! verification: a raw key, a PEM string (optionally base64 wrapped as it
//! travels on the wire), or an account. The two traits in this module
//! normalize all of them. [`SigningKeySource`] signs on behalf of its owner
//! and never hands the private key out.

use crate::ecc::{PrivateKey, PublicKey, Signature};
use crate::error::{EccError, EccResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// A parsed key: either a full key pair or only its public half
#[derive(Clone, Debug)]
pub enum KeyHandle {
    /// Private key, the public half is derived from it
    Private(PrivateKey),
    /// Public key only
    Public(PublicKey),
}

impl KeyHandle {
    /// The public half of this key
    pub fn public_key(&self) -> PublicKey {
        match self {
            KeyHandle::Private(key) => key.public_key(),
            KeyHandle::Public(key) => *key,
        }
    }

    /// The private key, if this handle carries one
    pub fn private_key(&self) -> Option<&PrivateKey> {
        match self {
            KeyHandle::Private(key) => Some(key),
            KeyHandle::Public(_) => None,
        }
    }
}

impl From<PrivateKey> for KeyHandle {
    fn from(key: PrivateKey) -> Self {
        KeyHandle::Private(key)
    }
}

impl From<PublicKey> for KeyHandle {
    fn from(key: PublicKey) -> Self {
        KeyHandle::Public(key)
    }
}

/// Parse PEM key material into a [`KeyHandle`]
///
/// Accepts PKCS#8 and SEC1 private keys and SPKI public keys, either as plain
/// PEM or base64 wrapped PEM.
pub fn key_from_pem(pem: &str) -> EccResult<KeyHandle> {
    let pem = unwrap_base64_pem(pem)?;

    if pem.contains("PRIVATE KEY-----") {
        return PrivateKey::from_pem(&pem).map(KeyHandle::Private);
    }
    if pem.contains("BEGIN PUBLIC KEY-----") {
        return PublicKey::from_pem(&pem).map(KeyHandle::Public);
    }

    Err(EccError::InvalidPublicKey {
        reason: "Unrecognised PEM label".to_string(),
    })
}

/// Return the PEM text, decoding one layer of base64 when no PEM armour is present
fn unwrap_base64_pem(input: &str) -> EccResult<String> {
    let trimmed = input.trim();
    if trimmed.starts_with("-----BEGIN") {
        return Ok(trimmed.to_string());
    }

    let bytes = STANDARD
        .decode(trimmed)
        .map_err(|e| EccError::InvalidPublicKey {
            reason: format!("Neither PEM nor base64 encoded PEM: {}", e),
        })?;
    let decoded = String::from_utf8(bytes).map_err(|e| EccError::InvalidPublicKey {
        reason: format!("Decoded PEM is not UTF-8: {}", e),
    })?;
    if !decoded.trim_start().starts_with("-----BEGIN") {
        return Err(EccError::InvalidPublicKey {
            reason: "Decoded value is not a PEM document".to_string(),
        });
    }
    Ok(decoded)
}

/// Anything that can produce an ECDSA signature
pub trait SigningKeySource {
    /// Sign `message` with ECDSA over SHA-256
    fn sign_message(&self, message: &[u8]) -> EccResult<Signature>;
}

/// Anything that can be resolved to a public key
pub trait VerifyingKeySource {
    /// Resolve to the public key used for verification
    fn verifying_key(&self) -> EccResult<PublicKey>;
}

impl SigningKeySource for PrivateKey {
    fn sign_message(&self, message: &[u8]) -> EccResult<Signature> {
        Ok(self.sign(message))
    }
}

impl SigningKeySource for KeyHandle {
    fn sign_message(&self, message: &[u8]) -> EccResult<Signature> {
        match self {
            KeyHandle::Private(key) => Ok(key.sign(message)),
            KeyHandle::Public(_) => Err(EccError::InvalidPrivateKey {
                reason: "Key handle only holds a public key".to_string(),
            }),
        }
    }
}

impl SigningKeySource for str {
    fn sign_message(&self, message: &[u8]) -> EccResult<Signature> {
        key_from_pem(self)?.sign_message(message)
    }
}

impl SigningKeySource for String {
    fn sign_message(&self, message: &[u8]) -> EccResult<Signature> {
        self.as_str().sign_message(message)
    }
}

impl VerifyingKeySource for PublicKey {
    fn verifying_key(&self) -> EccResult<PublicKey> {
        Ok(*self)
    }
}

impl VerifyingKeySource for PrivateKey {
    fn verifying_key(&self) -> EccResult<PublicKey> {
        Ok(self.public_key())
    }
}

impl VerifyingKeySource for KeyHandle {
    fn verifying_key(&self) -> EccResult<PublicKey> {
        Ok(self.public_key())
    }
}

impl VerifyingKeySource for str {
    fn verifying_key(&self) -> EccResult<PublicKey> {
        Ok(key_from_pem(self)?.public_key())
    }
}

impl VerifyingKeySource for String {
    fn verifying_key(&self) -> EccResult<PublicKey> {
        self.as_str().verifying_key()
    }
}
