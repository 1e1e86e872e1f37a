//! Signed Labchain transactions
//!
//! A transaction is built unsigned, signed once (or re-signed, which simply
//! replaces the signature) and then handed to the network, after which it is
//! not touched again. Its identity is the SHA-256 of the canonical
//! representation `payload ++ receiver ++ sender`, independent of the
//! signature.

use crate::chain::Identity;
use crate::ecc::{hash, Signature, SigningKeySource, VerifyingKeySource};
use crate::error::{ChainError, ChainResult};
use serde::{Deserialize, Serialize};

/// Wire form of a transaction, as consumed by the `sendTransaction` RPC method
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmittableTransaction {
    /// Sender public key, base64 PEM
    pub sender: String,
    /// Receiver public key (base64 PEM) or raw receiver string
    pub receiver: String,
    /// Free-form payload
    pub payload: String,
    /// Base64 DER signature, absent while unsigned
    #[serde(default)]
    pub signature: Option<String>,
}

/// A Labchain transaction
#[derive(Clone, Debug)]
pub struct Transaction {
    sender: Identity,
    receiver: Identity,
    payload: String,
    signature: Option<String>,
}

impl Transaction {
    /// Build an unsigned transaction
    pub fn new(sender: impl Into<Identity>, receiver: impl Into<Identity>, payload: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            payload: payload.into(),
            signature: None,
        }
    }

    /// Sending party
    pub fn sender(&self) -> &Identity {
        &self.sender
    }

    /// Receiving party
    pub fn receiver(&self) -> &Identity {
        &self.receiver
    }

    /// Payload text
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Base64 DER signature, if signed
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Whether a signature is present
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// The exact text that is hashed and signed
    ///
    /// Field order is part of the protocol: payload, then receiver, then sender.
    pub fn canonical_representation(&self) -> String {
        let payload = &self.payload;
        let receiver = self.receiver.resolve_to_pem();
        let sender = self.sender.resolve_to_pem();

        let mut canonical = String::with_capacity(payload.len() + receiver.len() + sender.len());
        canonical.push_str(payload);
        canonical.push_str(receiver);
        canonical.push_str(sender);
        canonical
    }

    /// Sign with a private key, a PEM string or an account
    ///
    /// Signing again overwrites the previous signature.
    pub fn sign<K>(&mut self, key: &K) -> ChainResult<&mut Self>
    where
        K: SigningKeySource + ?Sized,
    {
        let signature = key.sign_message(self.canonical_representation().as_bytes())?;
        self.signature = Some(signature.to_base64());
        Ok(self)
    }

    /// Verify the signature against a public key, PEM string, account or identity
    ///
    /// `signature_override` is checked instead of the stored signature when
    /// given. A signature that does not match yields `Ok(false)`; having no
    /// signature at all is [`ChainError::MissingSignature`].
    pub fn verify<K>(&self, key: &K, signature_override: Option<&str>) -> ChainResult<bool>
    where
        K: VerifyingKeySource + ?Sized,
    {
        let encoded = signature_override
            .or(self.signature.as_deref())
            .ok_or(ChainError::MissingSignature)?;
        let public_key = key.verifying_key()?;
        let signature = Signature::from_base64(encoded)?;

        Ok(public_key.verify(self.canonical_representation().as_bytes(), &signature))
    }

    /// Hex SHA-256 of the canonical representation
    pub fn hash(&self) -> String {
        hash::sha256_hex(self.canonical_representation().as_bytes())
    }

    /// Wire form of this transaction
    pub fn to_transmittable(&self) -> TransmittableTransaction {
        TransmittableTransaction {
            sender: self.sender.resolve_to_pem().to_string(),
            receiver: self.receiver.resolve_to_pem().to_string(),
            payload: self.payload.clone(),
            signature: self.signature.clone(),
        }
    }

    /// Wire form serialized as JSON text
    pub fn to_transmittable_string(&self) -> ChainResult<String> {
        serde_json::to_string(&self.to_transmittable()).map_err(|e| ChainError::InvalidTransaction {
            reason: format!("Failed to serialize transaction: {}", e),
        })
    }

    /// Rebuild a transaction received from a node
    ///
    /// Both parties become raw PEM identities.
    pub fn from_transmittable(wire: TransmittableTransaction) -> Self {
        Self {
            sender: Identity::RawPublicKeyPem(wire.sender),
            receiver: Identity::RawPublicKeyPem(wire.receiver),
            payload: wire.payload,
            signature: wire.signature.filter(|s| !s.is_empty()),
        }
    }

    /// Parse the JSON produced by [`Transaction::to_transmittable_string`]
    pub fn from_transmittable_str(json: &str) -> ChainResult<Self> {
        let wire: TransmittableTransaction = serde_json::from_str(json).map_err(|e| ChainError::InvalidTransaction {
            reason: format!("Failed to deserialize transaction: {}", e),
        })?;
        Ok(Self::from_transmittable(wire))
    }
}

impl From<TransmittableTransaction> for Transaction {
    fn from(wire: TransmittableTransaction) -> Self {
        Self::from_transmittable(wire)
    }
}
