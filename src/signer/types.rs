//! Signer error definitions.

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::miden::MidenError;
use crate::turnkey::TurnkeyError;

/// Errors raised by the signer adapter and its signing callback.
#[derive(Debug, Error)]
pub enum SignerError {
    /// Signing attempted without an active account.
    #[error("Turnkey wallet not connected")]
    NotConnected,

    /// The remote account carries no public key.
    #[error("Account has no public key")]
    MissingPublicKey,

    /// The remote service reported no wallets.
    #[error("No wallets found")]
    NoWallets,

    /// The first wallet has no Ethereum-formatted account.
    #[error("No accounts found")]
    NoAccounts,

    /// `connect()` without a login flow or externally supplied account.
    #[error("No account available; supply one with set_account()")]
    NoAccountSource,

    /// Built outside a Tokio runtime without an explicit handle.
    #[error("No Tokio runtime available; pass one with runtime()")]
    NoRuntime,

    /// The signer behind a descriptor was dropped.
    #[error("Signer no longer available")]
    Dropped,

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Remote(#[from] TurnkeyError),

    #[error(transparent)]
    Sdk(#[from] MidenError),
}

/// Result type for signer operations.
pub type SignerResult<T> = Result<T, SignerError>;
