//! Signer adapter.
//!
//! # Data Flow
//! ```text
//! set_account / connect / disconnect
//!     → adapter.rs (new ConnectionState, generation + 1)
//!     → rebuild: public key → commitment → signing callback
//!     → descriptor.rs SignerDescriptor published via watch channel
//!     → client keystore calls sign_cb(public key, signing inputs)
//!     → callback.rs → remote signer → signature bytes
//! ```

pub mod adapter;
pub mod callback;
pub mod descriptor;
pub mod types;

pub use adapter::{SignerOptions, SignerUpdates, Snapshot, TurnkeySigner, TurnkeySignerBuilder};
pub use callback::{not_connected_callback, turnkey_sign_callback, SigningContext};
pub use descriptor::{
    store_name, SignerAccountConfig, SignerControls, SignerDescriptor, SignerExtras, SIGNER_NAME,
};
pub use types::{SignerError, SignerResult};
