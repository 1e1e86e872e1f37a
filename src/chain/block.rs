//! Blocks as reported by a node

use crate::chain::{Transaction, TransmittableTransaction};
use crate::error::{ChainError, ChainResult};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A mined block
///
/// Read-only; built from the node's JSON with transactions rebuilt into
/// [`Transaction`] values and the Unix-seconds timestamp normalized.
#[derive(Clone, Debug)]
pub struct Block {
    /// Identifier of the node that mined the block
    pub creator: String,
    /// Proof-of-work difficulty; `-1` on the genesis block
    pub difficulty: i64,
    /// Proof-of-work nonce
    pub nonce: i64,
    /// Sequence number (block height)
    pub nr: u64,
    /// Hash of the predecessor, absent for the genesis block
    pub predecessor_block: Option<String>,
    /// Merkle root over the transactions, when the node reports it
    pub merkle_hash: Option<String>,
    /// Mining time
    pub timestamp: DateTime<Utc>,
    /// Included transactions
    pub transactions: Vec<Transaction>,
}

/// Block JSON exactly as a node sends it
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    /// Creator id; some nodes send a number
    #[serde(default)]
    pub creator: Value,
    /// Proof-of-work difficulty, negative when unset
    #[serde(default)]
    pub difficulty: i64,
    /// Proof-of-work nonce
    #[serde(default)]
    pub nonce: i64,
    /// Sequence number
    pub nr: u64,
    /// Predecessor hash
    #[serde(default)]
    pub predecessor_block: Option<String>,
    /// Merkle root
    #[serde(default)]
    pub merkle_hash: Option<String>,
    /// Unix seconds, integral or fractional
    pub timestamp: Value,
    /// Wire transactions
    #[serde(default)]
    pub transactions: Vec<TransmittableTransaction>,
}

impl TryFrom<RawBlock> for Block {
    type Error = ChainError;

    fn try_from(raw: RawBlock) -> ChainResult<Self> {
        let timestamp = normalize_timestamp(&raw.timestamp).ok_or_else(|| ChainError::InvalidBlock {
            reason: format!("block {} has an unusable timestamp: {}", raw.nr, raw.timestamp),
        })?;

        let creator = match raw.creator {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };

        Ok(Self {
            creator,
            difficulty: raw.difficulty,
            nonce: raw.nonce,
            nr: raw.nr,
            predecessor_block: raw.predecessor_block,
            merkle_hash: raw.merkle_hash,
            timestamp,
            transactions: raw.transactions.into_iter().map(Transaction::from_transmittable).collect(),
        })
    }
}

impl Block {
    /// Parse one block from node JSON
    pub fn from_json(value: Value) -> ChainResult<Self> {
        let raw: RawBlock = serde_json::from_value(value).map_err(|e| ChainError::InvalidBlock {
            reason: format!("Failed to deserialize block: {}", e),
        })?;
        Self::try_from(raw)
    }

    /// Hashes of all included transactions
    pub fn transaction_hashes(&self) -> impl Iterator<Item = String> + '_ {
        self.transactions.iter().map(Transaction::hash)
    }
}

/// Turn Unix seconds (integer or float) into a UTC instant
fn normalize_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    if let Some(secs) = value.as_i64() {
        return Utc.timestamp_opt(secs, 0).single();
    }

    let secs = value.as_f64()?;
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    Utc.timestamp_opt(whole as i64, nanos).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Account;
    use serde_json::json;

    #[test]
    fn test_block_from_node_json() {
        let sender = Account::generate().unwrap();
        let receiver = Account::generate().unwrap();
        let mut tx = Transaction::new(&sender, &receiver, "hello-0");
        tx.sign(&sender).unwrap();

        let block = Block::from_json(json!({
            "creator": "node-1",
            "difficulty": 3,
            "nonce": 42,
            "nr": 7,
            "predecessorBlock": "abc",
            "merkleHash": "def",
            "timestamp": 1_600_000_000,
            "transactions": [serde_json::to_value(tx.to_transmittable()).unwrap()],
        }))
        .unwrap();

        assert_eq!(block.nr, 7);
        assert_eq!(block.creator, "node-1");
        assert_eq!(block.timestamp.timestamp(), 1_600_000_000);
        assert_eq!(block.predecessor_block.as_deref(), Some("abc"));
        assert_eq!(block.merkle_hash.as_deref(), Some("def"));
        assert_eq!(block.transaction_hashes().collect::<Vec<_>>(), vec![tx.hash()]);
    }

    #[test]
    fn test_fractional_timestamp() {
        let block = Block::from_json(json!({
            "nr": 1,
            "timestamp": 1_600_000_000.25,
            "creator": 3,
            "predecessorBlock": null,
        }))
        .unwrap();

        assert_eq!(block.timestamp.timestamp(), 1_600_000_000);
        assert_eq!(block.timestamp.timestamp_subsec_millis(), 250);
        assert_eq!(block.creator, "3");
        assert!(block.predecessor_block.is_none());
        assert!(block.transactions.is_empty());
    }

    #[test]
    fn test_genesis_block() {
        let block = Block::from_json(json!({
            "nr": 0,
            "timestamp": 0,
            "creator": null,
            "difficulty": -1,
            "nonce": 0,
            "merkleHash": null,
            "predecessorBlock": null,
            "transactions": [],
        }))
        .unwrap();

        assert_eq!(block.nr, 0);
        assert_eq!(block.difficulty, -1);
        assert_eq!(block.timestamp.timestamp(), 0);
        assert!(block.creator.is_empty());
        assert_eq!(block.transaction_hashes().count(), 0);
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let result = Block::from_json(json!({"nr": 1, "timestamp": "yesterday"}));
        assert!(matches!(result, Err(ChainError::InvalidBlock { .. })));
    }
}
