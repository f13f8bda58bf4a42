//! Remote signature → client signature bytes.
//!
//! Layout of the produced buffer:
//! ```text
//! [0]       auth scheme tag (ECDSA secp256k1 / Keccak-256)
//! [1..33]   r, big-endian, left-padded
//! [33..65]  s, big-endian, left-padded
//! [65]      recovery id (0 or 1)
//! ```

use crate::crypto::types::{decode_hex, CryptoError, CryptoResult};
use crate::turnkey::types::RawSignature;

/// Auth scheme tag the client verifier expects for ECDSA over Keccak-256.
pub const AUTH_SCHEME_ECDSA_K256_KECCAK: u8 = 1;

/// Width of each scalar component.
const SCALAR_LEN: usize = 32;

/// Total length of an encoded signature.
pub const SIGNATURE_LEN: usize = 1 + SCALAR_LEN * 2 + 1;

/// Assemble the client signature bytes from a remote `(r, s, v)` triple.
pub fn from_turnkey_signature(sig: &RawSignature) -> CryptoResult<Vec<u8>> {
    let r = decode_hex("r", &sig.r)?;
    let s = decode_hex("s", &sig.s)?;
    let v = recovery_id(&sig.v)?;

    let mut out = Vec::with_capacity(SIGNATURE_LEN);
    out.push(AUTH_SCHEME_ECDSA_K256_KECCAK);
    push_scalar(&mut out, "r", &r)?;
    push_scalar(&mut out, "s", &s)?;
    out.push(v);
    Ok(out)
}

fn push_scalar(out: &mut Vec<u8>, component: &'static str, bytes: &[u8]) -> CryptoResult<()> {
    if bytes.len() > SCALAR_LEN {
        return Err(CryptoError::ComponentTooLong {
            component,
            len: bytes.len(),
            max: SCALAR_LEN,
        });
    }
    out.extend(std::iter::repeat(0u8).take(SCALAR_LEN - bytes.len()));
    out.extend_from_slice(bytes);
    Ok(())
}

/// Normalize `v` to a 0/1 recovery id. Legacy 27/28 values are accepted.
fn recovery_id(v: &str) -> CryptoResult<u8> {
    let bytes = decode_hex("v", v)?;
    if bytes.len() > 8 {
        return Err(CryptoError::ComponentTooLong {
            component: "v",
            len: bytes.len(),
            max: 8,
        });
    }
    let value = bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    match value {
        0 | 1 => Ok(value as u8),
        27 | 28 => Ok((value - 27) as u8),
        other => Err(CryptoError::InvalidRecoveryId(other)),
    }
}
