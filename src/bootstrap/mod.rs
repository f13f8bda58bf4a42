//! Client bootstrap.
//!
//! # Data Flow
//! ```text
//! wallets + BootstrapRequest
//!     → client.rs (pick embedded account, resolve organization)
//!     → SDK create_client(keystore = remote signing callback)
//!     → account.rs (build → import? → create if absent → sync)
//!     → LoadedClient { client, account_id }
//! ```

pub mod account;
pub mod client;
pub mod types;

pub use account::create_account;
pub use client::{create_miden_turnkey_client, first_embedded_account, ClientBootstrap};
pub use types::{
    BootstrapError, BootstrapOptions, BootstrapRequest, BootstrapResult, ClientOptions,
    LoadedClient, TurnkeyConfig,
};
