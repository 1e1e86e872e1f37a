//! Transaction parties

use crate::chain::Account;
use crate::ecc::{PublicKey, VerifyingKeySource};
use crate::error::EccResult;

/// A party referenced by a transaction
///
/// Either a live [`Account`] or the bare public key string that travels on
/// the wire. Both resolve to the same canonical text, the base64 PEM public
/// key, so a transaction hashes identically before and after transmission.
#[derive(Clone, Debug)]
pub enum Identity {
    /// A key-pair holding account
    Account(Account),
    /// A base64 PEM public key (or any raw receiver string) as sent by a node
    RawPublicKeyPem(String),
}

impl Identity {
    /// Canonical text of this party
    pub fn resolve_to_pem(&self) -> &str {
        match self {
            Identity::Account(account) => account.public_key_pem_base64(),
            Identity::RawPublicKeyPem(pem) => pem,
        }
    }

    /// The account behind this identity, if it is a live one
    pub fn account(&self) -> Option<&Account> {
        match self {
            Identity::Account(account) => Some(account),
            Identity::RawPublicKeyPem(_) => None,
        }
    }
}

impl VerifyingKeySource for Identity {
    fn verifying_key(&self) -> EccResult<PublicKey> {
        match self {
            Identity::Account(account) => Ok(account.public_key()),
            Identity::RawPublicKeyPem(pem) => PublicKey::from_pem_base64(pem),
        }
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.resolve_to_pem() == other.resolve_to_pem()
    }
}

impl Eq for Identity {}

impl From<Account> for Identity {
    fn from(account: Account) -> Self {
        Identity::Account(account)
    }
}

impl From<&Account> for Identity {
    fn from(account: &Account) -> Self {
        Identity::Account(account.clone())
    }
}

impl From<String> for Identity {
    fn from(pem: String) -> Self {
        Identity::RawPublicKeyPem(pem)
    }
}

impl From<&str> for Identity {
    fn from(pem: &str) -> Self {
        Identity::RawPublicKeyPem(pem.to_string())
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.resolve_to_pem())
    }
}
