//! Digital signature implementation

use crate::ecc::constants::MAX_DER_SIGNATURE_SIZE;
use crate::error::{EccError, EccResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use p256::ecdsa::Signature as EcdsaSignature;

/// An ECDSA P-256 signature
///
/// Serialized as DER (an ASN.1 SEQUENCE of the two INTEGERs r and s) and
/// base64 encoded on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    signature: EcdsaSignature,
}

impl Signature {
    pub(crate) fn from_inner(signature: EcdsaSignature) -> Self {
        Self { signature }
    }

    pub(crate) fn inner(&self) -> &EcdsaSignature {
        &self.signature
    }

    /// Parse a DER encoded signature
    pub fn from_der(bytes: &[u8]) -> EccResult<Self> {
        if bytes.len() > MAX_DER_SIGNATURE_SIZE {
            return Err(EccError::InvalidSignature {
                reason: format!(
                    "DER signature too long: at most {} bytes, got {}",
                    MAX_DER_SIGNATURE_SIZE,
                    bytes.len()
                ),
            });
        }

        let signature = EcdsaSignature::from_der(bytes).map_err(|e| EccError::InvalidSignature {
            reason: format!("Invalid DER data: {}", e),
        })?;
        Ok(Self { signature })
    }

    /// Parse a base64 encoded DER signature
    pub fn from_base64(encoded: &str) -> EccResult<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| EccError::InvalidSignature {
                reason: format!("Invalid base64: {}", e),
            })?;
        Self::from_der(&bytes)
    }

    /// DER encoding
    pub fn to_der(&self) -> Vec<u8> {
        self.signature.to_der().as_bytes().to_vec()
    }

    /// Base64 encoded DER, the wire form
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_der())
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_base64())
    }
}

impl std::str::FromStr for Signature {
    type Err = EccError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base64(s)
    }
}
