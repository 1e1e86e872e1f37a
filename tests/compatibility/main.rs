//! Cross-implementation compatibility tests
//!
//! Verifies that keys, hashes and signatures produced by the Python node
//! tooling are understood here, and the other way round.

mod vectors;

use labchain_bench::chain::{Account, Transaction, TransmittableTransaction};
use labchain_bench::ecc::{key_from_pem, sha256_hex, PublicKey};
use vectors::*;

/// Compare strings with detailed error reporting
fn assert_strings_equal(actual: &str, expected: &str, context: &str) {
    if actual != expected {
        panic!("Strings differ in {}\nExpected: '{}'\nActual:   '{}'", context, expected, actual);
    }
}

fn node_transaction(signature: &str) -> Transaction {
    Transaction::from_transmittable(TransmittableTransaction {
        sender: SENDER_PUBLIC_PEM_B64.to_string(),
        receiver: RECEIVER_PUBLIC_PEM_B64.to_string(),
        payload: PAYLOAD.to_string(),
        signature: Some(signature.to_string()),
    })
}

#[test]
fn test_transaction_hash_compatibility() {
    let tx = node_transaction(SENDER_SIGNATURE);
    assert_strings_equal(&tx.hash(), TRANSACTION_HASH, "transaction hash");

    let canonical = format!("{}{}{}", PAYLOAD, RECEIVER_PUBLIC_PEM_B64, SENDER_PUBLIC_PEM_B64);
    assert_strings_equal(&tx.canonical_representation(), &canonical, "canonical representation");
    assert_strings_equal(&sha256_hex(canonical.as_bytes()), TRANSACTION_HASH, "sha256 of canonical text");
}

#[test]
fn test_node_signature_verifies() {
    let tx = node_transaction(SENDER_SIGNATURE);
    assert!(tx.verify(SENDER_PUBLIC_PEM_B64, None).unwrap());
    assert!(tx.verify(SENDER_PUBLIC_PEM, None).unwrap());
    assert!(tx.verify(tx.sender(), None).unwrap());

    // signed by the wrong party
    assert!(!tx.verify(SENDER_PUBLIC_PEM_B64, Some(RECEIVER_SIGNATURE)).unwrap());
    assert!(!tx.verify(tx.receiver(), None).unwrap());
}

#[test]
fn test_private_key_formats_agree() {
    let from_pkcs8 = Account::from_pem(SENDER_PKCS8_PEM).expect("PKCS#8 key should parse");
    let from_sec1 = Account::from_pem(SENDER_SEC1_PEM).expect("SEC1 key should parse");
    let expected = PublicKey::from_pem(SENDER_PUBLIC_PEM).unwrap();

    assert_eq!(from_pkcs8.public_key(), expected);
    assert_eq!(from_sec1.public_key(), expected);
    assert_eq!(from_pkcs8, from_sec1);
    assert_eq!(key_from_pem(SENDER_PUBLIC_PEM_B64).unwrap().public_key(), expected);
}

#[test]
fn test_public_pem_export_matches_node() {
    let account = Account::from_pem(SENDER_PKCS8_PEM).unwrap();
    assert_strings_equal(account.public_key_pem_base64(), SENDER_PUBLIC_PEM_B64, "base64 public PEM");
}

#[test]
fn test_local_signature_over_node_transaction() {
    let account = Account::from_pem(SENDER_SEC1_PEM).unwrap();
    let mut tx = Transaction::new(&account, RECEIVER_PUBLIC_PEM_B64, PAYLOAD);
    account.sign_transaction(&mut tx).unwrap();

    assert_strings_equal(&tx.hash(), TRANSACTION_HASH, "hash of locally built transaction");
    // the node checks our signature with only the wire form at hand
    let wire = Transaction::from_transmittable_str(&tx.to_transmittable_string().unwrap()).unwrap();
    assert!(wire.verify(SENDER_PUBLIC_PEM_B64, None).unwrap());
}
