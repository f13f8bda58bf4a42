//! Account seed derivation.

use alloy::primitives::keccak256;

/// Size of an account builder seed.
pub const ACCOUNT_SEED_LEN: usize = 32;

/// Derive a builder seed from a human-readable string.
///
/// Returns `None` for an absent or empty string so callers fall back to the
/// all-zero seed.
pub fn account_seed_from_str(seed: Option<&str>) -> Option<[u8; ACCOUNT_SEED_LEN]> {
    match seed {
        Some(s) if !s.is_empty() => Some(keccak256(s.as_bytes()).0),
        _ => None,
    }
}
