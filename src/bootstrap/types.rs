//! Bootstrap options and error definitions.

use std::sync::Arc;
use thiserror::Error;

use crate::crypto::CryptoError;
use crate::miden::{AccountId, AccountType, MidenClient, MidenError, StorageMode};
use crate::turnkey::{RemoteClient, TurnkeyError, WalletAccount};

/// Remote signer identity a client signs with.
#[derive(Debug, Clone)]
pub struct TurnkeyConfig {
    pub client: RemoteClient,
    pub organization_id: String,
    pub account: WalletAccount,
}

/// Client construction and account resolution settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub endpoint: Option<String>,
    pub note_transport_url: Option<String>,
    /// Client RNG seed.
    pub seed: Option<String>,
    /// Account builder seed; hashed to 32 bytes.
    pub account_seed: Option<String>,
    pub account_type: AccountType,
    pub storage_mode: StorageMode,
}

/// Host-level options of [`crate::bootstrap::ClientBootstrap::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapOptions {
    pub account_seed: Option<String>,
    pub note_transport_url: Option<String>,
    /// Overrides the node URL when set.
    pub endpoint: Option<String>,
    pub organization_id: Option<String>,
    pub client_seed: Option<String>,
}

/// Inputs of one bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapRequest {
    pub node_url: String,
    pub storage_mode: StorageMode,
    pub options: BootstrapOptions,
}

impl BootstrapRequest {
    pub fn new(node_url: impl Into<String>) -> Self {
        Self {
            node_url: node_url.into(),
            storage_mode: StorageMode::Public,
            options: BootstrapOptions::default(),
        }
    }

    /// Node endpoint: the non-empty `endpoint` option, else `node_url`.
    pub fn endpoint(&self) -> String {
        self.options
            .endpoint
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| self.node_url.clone())
    }
}

/// A client wired to the remote signer and its resolved account.
#[derive(Clone)]
pub struct LoadedClient {
    pub client: Arc<dyn MidenClient>,
    pub account_id: AccountId,
}

impl std::fmt::Debug for LoadedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedClient")
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// Errors that can occur while bootstrapping a client.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The remote account has no public key to derive the commitment from.
    #[error("Remote account {0} has no public key")]
    MissingPublicKey(String),

    /// No organization id in options or the remote session.
    #[error("No organization ID found")]
    MissingOrganizationId,

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Sdk(#[from] MidenError),

    #[error(transparent)]
    Remote(#[from] TurnkeyError),
}

/// Result type for bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;
