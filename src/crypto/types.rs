//! Error definitions for key and signature encoding.

use thiserror::Error;

/// Errors raised while decoding keys or assembling signatures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Input was not valid hexadecimal.
    #[error("Invalid hex in {field}: {reason}")]
    InvalidHex { field: &'static str, reason: String },

    /// Bytes do not encode a point on secp256k1.
    #[error("Malformed public key: {0}")]
    MalformedPublicKey(String),

    /// A signature component exceeds its fixed width.
    #[error("Signature component {component} is {len} bytes, expected at most {max}")]
    ComponentTooLong {
        component: &'static str,
        len: usize,
        max: usize,
    },

    /// Recovery id outside of the accepted range.
    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u64),
}

/// Result type for crypto helpers.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Decode a hex string with or without a `0x` prefix.
pub(crate) fn decode_hex(field: &'static str, value: &str) -> CryptoResult<Vec<u8>> {
    let trimmed = value.strip_prefix("0x").unwrap_or(value);
    // Remote APIs occasionally drop the leading zero nibble.
    let padded;
    let input = if trimmed.len() % 2 == 1 {
        padded = format!("0{}", trimmed);
        padded.as_str()
    } else {
        trimmed
    };
    hex::decode(input).map_err(|e| CryptoError::InvalidHex {
        field,
        reason: e.to_string(),
    })
}
