//! The descriptor handed to the blockchain client.

use std::sync::Weak;

use crate::miden::{AccountType, SignCallback, StorageMode};
use crate::signer::adapter::SignerInner;
use crate::signer::callback::not_connected_callback;
use crate::signer::types::{SignerError, SignerResult};
use crate::turnkey::{RemoteClient, WalletAccount};

/// Display name of this signer.
pub const SIGNER_NAME: &str = "Turnkey";

/// Prefix of the per-account storage namespace.
pub const STORE_NAME_PREFIX: &str = "turnkey_";

/// Storage namespace isolating local client state per remote account.
pub fn store_name(address: &str) -> String {
    format!("{}{}", STORE_NAME_PREFIX, address)
}

/// Account configuration derived from the remote key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerAccountConfig {
    /// Serialized public key commitment.
    pub public_key_commitment: Vec<u8>,
    pub account_type: AccountType,
    pub storage_mode: StorageMode,
    pub account_seed: Option<[u8; 32]>,
}

/// Connect/disconnect handle carried by descriptors.
///
/// Holds a weak reference so a descriptor never keeps its signer alive.
#[derive(Clone)]
pub struct SignerControls {
    pub(crate) inner: Weak<SignerInner>,
}

impl SignerControls {
    pub async fn connect(&self) -> SignerResult<()> {
        let inner = self.inner.upgrade().ok_or(SignerError::Dropped)?;
        SignerInner::connect(&inner).await
    }

    pub fn disconnect(&self) {
        if let Some(inner) = self.inner.upgrade() {
            SignerInner::disconnect(&inner);
        }
    }
}

/// Signing capability plus account configuration. Immutable once published.
#[derive(Clone)]
pub struct SignerDescriptor {
    pub sign_cb: SignCallback,
    /// `None` while disconnected.
    pub account_config: Option<SignerAccountConfig>,
    pub store_name: String,
    pub name: &'static str,
    pub is_connected: bool,
    pub(crate) controls: SignerControls,
}

impl SignerDescriptor {
    /// Placeholder published while no account is connected.
    pub(crate) fn disconnected(controls: SignerControls) -> Self {
        Self {
            sign_cb: not_connected_callback(),
            account_config: None,
            store_name: String::new(),
            name: SIGNER_NAME,
            is_connected: false,
            controls,
        }
    }

    /// Invoke the signing callback.
    pub async fn sign(&self, public_key: Vec<u8>, signing_inputs: Vec<u8>) -> SignerResult<Vec<u8>> {
        (self.sign_cb)(public_key, signing_inputs).await
    }

    pub async fn connect(&self) -> SignerResult<()> {
        self.controls.connect().await
    }

    pub fn disconnect(&self) {
        self.controls.disconnect()
    }
}

impl std::fmt::Debug for SignerDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerDescriptor")
            .field("name", &self.name)
            .field("store_name", &self.store_name)
            .field("is_connected", &self.is_connected)
            .field("account_config", &self.account_config)
            .finish()
    }
}

/// Signer-specific state beyond the descriptor.
#[derive(Debug, Clone)]
pub struct SignerExtras {
    pub client: RemoteClient,
    pub organization_id: String,
    pub account: Option<WalletAccount>,
    pub is_connected: bool,
}
