//! Client SDK value types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::crypto::{Commitment, CryptoError};

/// On-chain account identifier as rendered by the SDK.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Account visibility and persistence policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    #[default]
    Public,
    Private,
    Network,
}

impl StorageMode {
    pub fn is_private(&self) -> bool {
        matches!(self, StorageMode::Private)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Public => "public",
            StorageMode::Private => "private",
            StorageMode::Network => "network",
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StorageMode {
    type Err = MidenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(StorageMode::Public),
            "private" => Ok(StorageMode::Private),
            "network" => Ok(StorageMode::Network),
            other => Err(MidenError::InvalidArgument(format!("unknown storage mode '{}'", other))),
        }
    }
}

/// Account kind recognized by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountType {
    FungibleFaucet,
    NonFungibleFaucet,
    #[default]
    RegularAccountImmutableCode,
    RegularAccountUpdatableCode,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountType::FungibleFaucet => "FungibleFaucet",
            AccountType::NonFungibleFaucet => "NonFungibleFaucet",
            AccountType::RegularAccountImmutableCode => "RegularAccountImmutableCode",
            AccountType::RegularAccountUpdatableCode => "RegularAccountUpdatableCode",
        };
        f.write_str(name)
    }
}

/// Inputs to the SDK account builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBuildRequest {
    /// Builder seed; the same seed and commitment always yield the same id.
    pub seed: [u8; 32],
    /// Auth component commitment.
    pub auth_commitment: Commitment,
    pub account_type: AccountType,
    pub storage_mode: StorageMode,
    /// Attach the basic wallet component.
    pub with_basic_wallet: bool,
}

/// An account as built or stored by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub account_type: AccountType,
    pub storage_mode: StorageMode,
    pub nonce: u64,
}

/// Parameters for constructing a client with an external keystore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientParams {
    /// Node RPC endpoint.
    pub endpoint: Option<String>,
    pub note_transport_url: Option<String>,
    /// Client RNG seed.
    pub seed: Option<String>,
}

/// Errors surfaced by the client SDK seam.
#[derive(Debug, Error)]
pub enum MidenError {
    /// SDK accessed before the explicit load step.
    #[error("Client SDK not loaded")]
    NotLoaded,

    /// Loading the SDK failed.
    #[error("Client SDK failed to load: {0}")]
    Load(String),

    /// Signing inputs could not be deserialized.
    #[error("Invalid signing inputs: {0}")]
    SigningInputs(String),

    /// Account builder rejected its inputs.
    #[error("Account build failed: {0}")]
    AccountBuild(String),

    /// Account unknown to the network.
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),

    /// Node RPC failure.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Local store failure.
    #[error("Store error: {0}")]
    Store(String),

    /// Client already terminated.
    #[error("Client terminated")]
    Terminated,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Key or signature encoding rejected.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl MidenError {
    /// Whether the error only says the account does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MidenError::AccountNotFound(_))
    }
}

/// Result type for client SDK operations.
pub type MidenResult<T> = Result<T, MidenError>;
