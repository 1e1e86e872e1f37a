//! Accounts: an owned P-256 key pair that signs transactions for its owner

use crate::chain::Transaction;
use crate::ecc::{PrivateKey, PublicKey, Signature, SigningKeySource, VerifyingKeySource};
use crate::error::{ChainResult, EccResult};

/// A key-pair holding party
///
/// Accounts are ephemeral: they are created per benchmark run and never
/// persisted. The key pair is fixed at construction, and so is the exported
/// public key, which is computed once.
#[derive(Clone)]
pub struct Account {
    private_key: PrivateKey,
    public_key_pem_base64: String,
}

impl Account {
    /// Create an account with a fresh key pair
    pub fn generate() -> ChainResult<Self> {
        Self::from_private_key(PrivateKey::generate())
    }

    /// Create an account from a PEM private key (plain or base64 wrapped)
    pub fn from_pem(pem: &str) -> ChainResult<Self> {
        let handle = crate::ecc::key_from_pem(pem)?;
        match handle.private_key() {
            Some(key) => Self::from_private_key(key.clone()),
            None => Err(crate::error::EccError::InvalidPrivateKey {
                reason: "An account needs a private key, got a public key PEM".to_string(),
            }
            .into()),
        }
    }

    /// Create an account, reusing `pem` when given and generating a key pair otherwise
    pub fn create_account(pem: Option<&str>) -> ChainResult<Self> {
        match pem {
            Some(pem) => Self::from_pem(pem),
            None => Self::generate(),
        }
    }

    fn from_private_key(private_key: PrivateKey) -> ChainResult<Self> {
        let public_key_pem_base64 = private_key.public_key().to_pem_base64()?;
        Ok(Self {
            private_key,
            public_key_pem_base64,
        })
    }

    /// The account's public key
    pub fn public_key(&self) -> PublicKey {
        self.private_key.public_key()
    }

    /// The public key as base64 encoded PEM, stable for the account's lifetime
    pub fn public_key_pem_base64(&self) -> &str {
        &self.public_key_pem_base64
    }

    /// Sign `transaction` in place and hand it back for chaining
    pub fn sign_transaction<'a>(&self, transaction: &'a mut Transaction) -> ChainResult<&'a mut Transaction> {
        transaction.sign(self)
    }
}

impl SigningKeySource for Account {
    fn sign_message(&self, message: &[u8]) -> EccResult<Signature> {
        Ok(self.private_key.sign(message))
    }
}

impl VerifyingKeySource for Account {
    fn verifying_key(&self) -> EccResult<PublicKey> {
        Ok(self.public_key())
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.public_key_pem_base64 == other.public_key_pem_base64
    }
}

impl Eq for Account {}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}
