//! Key and signature encodings shared by the signer and the bootstrap.
//!
//! # Data Flow
//! ```text
//! remote account public key (hex, SEC1)
//!     → commitment.rs (normalize, Keccak-256)
//!     → Commitment (account auth material + storage namespace seed)
//!
//! remote signature {r, s, v}
//!     → signature.rs (fixed-width byte layout)
//!     → bytes handed back to the client keystore
//! ```

pub mod commitment;
pub mod seed;
pub mod signature;
pub mod types;

pub use commitment::{evm_public_key_to_commitment, public_key_bytes, Commitment};
pub use seed::account_seed_from_str;
pub use signature::{from_turnkey_signature, SIGNATURE_LEN};
pub use types::{CryptoError, CryptoResult};
