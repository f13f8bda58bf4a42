//! Public key commitments.
//!
//! # Responsibilities
//! - Parse the secp256k1 public key reported by the remote signer
//! - Normalize it to the compressed SEC1 encoding
//! - Hash it into the fixed-size commitment the account authenticates with
//!
//! # Design Decisions
//! - Compressed and uncompressed inputs yield the same commitment
//! - The commitment is a pure function of the key; no caching

use alloy::primitives::{keccak256, B256};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use std::fmt;

use crate::crypto::types::{decode_hex, CryptoError, CryptoResult};

/// Size of a commitment in bytes.
pub const COMMITMENT_LEN: usize = 32;

/// Commitment to an account's public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment(B256);

impl Commitment {
    /// Wrap commitment bytes produced elsewhere, e.g. by the client SDK.
    pub fn from_bytes(bytes: [u8; COMMITMENT_LEN]) -> Self {
        Self(B256::from(bytes))
    }

    /// Derive the commitment for a SEC1-encoded secp256k1 public key.
    pub fn from_sec1_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let key = PublicKey::from_sec1_bytes(bytes)
            .map_err(|e| CryptoError::MalformedPublicKey(e.to_string()))?;
        let compressed = key.to_encoded_point(true);
        Ok(Self(keccak256(compressed.as_bytes())))
    }

    /// Raw commitment bytes.
    pub fn as_bytes(&self) -> &[u8; COMMITMENT_LEN] {
        &self.0 .0
    }

    /// Serialized form handed to the client as account configuration.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Commitment").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Derive the commitment for a hex-encoded EVM public key.
///
/// Accepts compressed (33 byte) and uncompressed (65 byte) encodings, with or
/// without a `0x` prefix.
pub fn evm_public_key_to_commitment(public_key_hex: &str) -> CryptoResult<Commitment> {
    let bytes = public_key_bytes(public_key_hex)?;
    Commitment::from_sec1_bytes(&bytes)
}

/// Decode a hex public key into SEC1 bytes without validating the point.
pub fn public_key_bytes(public_key_hex: &str) -> CryptoResult<Vec<u8>> {
    decode_hex("public key", public_key_hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::SecretKey;

    fn test_key() -> PublicKey {
        SecretKey::from_slice(&[0x11; 32])
            .expect("valid scalar")
            .public_key()
    }

    #[test]
    fn test_compressed_and_uncompressed_agree() {
        let key = test_key();
        let compressed = hex::encode(key.to_encoded_point(true).as_bytes());
        let uncompressed = format!("0x{}", hex::encode(key.to_encoded_point(false).as_bytes()));

        let a = evm_public_key_to_commitment(&compressed).unwrap();
        let b = evm_public_key_to_commitment(&uncompressed).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes().len(), COMMITMENT_LEN);
    }

    #[test]
    fn test_commitment_is_deterministic() {
        let key = hex::encode(test_key().to_encoded_point(false).as_bytes());
        let first = evm_public_key_to_commitment(&key).unwrap();
        let second = evm_public_key_to_commitment(&key).unwrap();
        assert_eq!(first.to_hex(), second.to_hex());
        assert!(first.to_hex().starts_with("0x"));
        assert_eq!(first.to_hex().len(), 2 + 2 * COMMITMENT_LEN);
    }

    #[test]
    fn test_distinct_keys_distinct_commitments() {
        let other = SecretKey::from_slice(&[0x22; 32]).unwrap().public_key();
        let a = Commitment::from_sec1_bytes(test_key().to_encoded_point(true).as_bytes()).unwrap();
        let b = Commitment::from_sec1_bytes(other.to_encoded_point(true).as_bytes()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_truncated_key() {
        let err = evm_public_key_to_commitment("0x04abcdef").unwrap_err();
        assert!(matches!(err, CryptoError::MalformedPublicKey(_)));
    }

    #[test]
    fn test_rejects_non_hex() {
        let err = evm_public_key_to_commitment("0x04abcdef...").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidHex { .. }));
    }
}
