//! Remote-signer adapter for the Miden client
//!
//! Routes account authentication through keys held by the Turnkey signing
//! service and bootstraps client instances wired to that signer.

pub mod bootstrap;
pub mod config;
pub mod crypto;
pub mod miden;
pub mod observability;
pub mod signer;
pub mod turnkey;

pub use bootstrap::{create_miden_turnkey_client, ClientBootstrap, LoadedClient};
pub use config::AdapterConfig;
pub use crypto::{evm_public_key_to_commitment, from_turnkey_signature, Commitment};
pub use signer::{SignerDescriptor, TurnkeySigner};
pub use turnkey::RemoteClient;
