//! Connection state and descriptor publication.
//!
//! # Responsibilities
//! - Hold the active remote account and connected flag
//! - Rebuild the signer descriptor whenever either changes
//! - Publish descriptors wholesale to subscribers
//!
//! # Design Decisions
//! - Connection state is an `ArcSwap` snapshot carrying a generation counter
//! - A rebuild commits only if its generation is still current
//! - Rebuild failures degrade to the disconnected placeholder
//! - Rebuilds run on the runtime captured at build time, so `set_account` works
//!   from plain threads
//! - Subscribers only receive owned snapshots; no channel borrow escapes

use arc_swap::ArcSwap;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::crypto::{account_seed_from_str, public_key_bytes};
use crate::miden::{AccountType, SdkLoader, StorageMode};
use crate::observability::metrics;
use crate::signer::callback::{turnkey_sign_callback, SigningContext};
use crate::signer::descriptor::{
    store_name, SignerAccountConfig, SignerControls, SignerDescriptor, SignerExtras, SIGNER_NAME,
};
use crate::signer::types::{SignerError, SignerResult};
use crate::turnkey::login::{ensure_session, LoginFlow};
use crate::turnkey::{RemoteClient, WalletAccount};

/// Account and connection flag at one generation.
#[derive(Debug, Clone, Default)]
struct ConnectionState {
    generation: u64,
    account: Option<WalletAccount>,
    connected: bool,
    organization_id: String,
}

/// A published descriptor and the generation that produced it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub generation: u64,
    pub descriptor: SignerDescriptor,
}

/// Account settings applied to every descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerOptions {
    pub account_type: AccountType,
    pub storage_mode: StorageMode,
    pub account_seed: Option<String>,
}

impl Default for SignerOptions {
    fn default() -> Self {
        Self {
            account_type: AccountType::RegularAccountImmutableCode,
            storage_mode: StorageMode::Public,
            account_seed: None,
        }
    }
}

/// Receiver of published snapshots.
///
/// Every accessor clones the snapshot out, so calling descriptor controls on a
/// received snapshot never contends with the publisher.
pub struct SignerUpdates {
    rx: watch::Receiver<Snapshot>,
}

impl SignerUpdates {
    /// The most recently published snapshot.
    pub fn latest(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    /// Wait for a snapshot not yet seen by this receiver.
    pub async fn changed(&mut self) -> SignerResult<Snapshot> {
        self.rx.changed().await.map_err(|_| SignerError::Dropped)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

pub(crate) struct SignerInner {
    runtime: Handle,
    remote: RemoteClient,
    sdk: Arc<SdkLoader>,
    login: Option<Arc<dyn LoginFlow>>,
    options: SignerOptions,
    state: ArcSwap<ConnectionState>,
    published: watch::Sender<Snapshot>,
}

/// Remote-signer adapter exposing a descriptor to the blockchain client.
///
/// Cheap to clone; clones share state. Account changes may come from any
/// thread.
#[derive(Clone)]
pub struct TurnkeySigner {
    inner: Arc<SignerInner>,
}

/// Builder for [`TurnkeySigner`].
pub struct TurnkeySignerBuilder {
    remote: RemoteClient,
    sdk: Arc<SdkLoader>,
    organization_id: String,
    login: Option<Arc<dyn LoginFlow>>,
    options: SignerOptions,
    runtime: Option<Handle>,
}

impl TurnkeySignerBuilder {
    pub fn organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = organization_id.into();
        self
    }

    /// Enable `connect()` to log in and pick an account itself.
    pub fn login(mut self, login: Arc<dyn LoginFlow>) -> Self {
        self.login = Some(login);
        self
    }

    pub fn options(mut self, options: SignerOptions) -> Self {
        self.options = options;
        self
    }

    /// Runtime that descriptor rebuilds are spawned on. Defaults to the
    /// runtime `build()` is called from.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Fails with [`SignerError::NoRuntime`] outside a Tokio runtime unless
    /// one was passed with [`Self::runtime`].
    pub fn build(self) -> SignerResult<TurnkeySigner> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| SignerError::NoRuntime)?,
        };
        let inner = Arc::new_cyclic(|weak| {
            let controls = SignerControls { inner: weak.clone() };
            let (published, _) = watch::channel(Snapshot {
                generation: 0,
                descriptor: SignerDescriptor::disconnected(controls),
            });
            SignerInner {
                runtime,
                remote: self.remote,
                sdk: self.sdk,
                login: self.login,
                options: self.options,
                state: ArcSwap::from_pointee(ConnectionState {
                    organization_id: self.organization_id,
                    ..ConnectionState::default()
                }),
                published,
            }
        });
        Ok(TurnkeySigner { inner })
    }
}

impl TurnkeySigner {
    pub fn builder(remote: RemoteClient, sdk: Arc<SdkLoader>) -> TurnkeySignerBuilder {
        TurnkeySignerBuilder {
            remote,
            sdk,
            organization_id: String::new(),
            login: None,
            options: SignerOptions::default(),
            runtime: None,
        }
    }

    /// Replace the active account. `None` disconnects.
    pub fn set_account(&self, account: Option<WalletAccount>) {
        self.inner.set_account(account);
    }

    /// Connect using the current account or the configured login flow.
    pub async fn connect(&self) -> SignerResult<()> {
        self.inner.connect().await
    }

    /// Clear the account. Idempotent.
    pub fn disconnect(&self) {
        self.inner.disconnect();
    }

    /// The account currently selected.
    pub fn account(&self) -> Option<WalletAccount> {
        self.inner.state.load().account.clone()
    }

    /// Latest published descriptor.
    pub fn descriptor(&self) -> SignerDescriptor {
        self.inner.published.borrow().descriptor.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.published.borrow().descriptor.is_connected
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> SignerUpdates {
        SignerUpdates {
            rx: self.inner.published.subscribe(),
        }
    }

    /// Wait until the descriptor for the latest account change is published.
    pub async fn settled(&self) -> SignerDescriptor {
        let target = self.inner.state.load().generation;
        let mut rx = self.inner.published.subscribe();
        let waited = rx
            .wait_for(|s| s.generation >= target)
            .await
            .map(|snapshot| snapshot.descriptor.clone());
        waited.unwrap_or_else(|_| self.descriptor())
    }

    pub fn extras(&self) -> SignerExtras {
        let state = self.inner.state.load();
        SignerExtras {
            client: self.inner.remote.clone(),
            organization_id: state.organization_id.clone(),
            account: state.account.clone(),
            is_connected: self.is_connected(),
        }
    }
}

impl SignerInner {
    fn set_account(self: &Arc<Self>, account: Option<WalletAccount>) {
        let connected = account.is_some();
        self.transition(account, connected, None);
    }

    pub(crate) fn disconnect(self: &Arc<Self>) {
        self.transition(None, false, None);
    }

    pub(crate) async fn connect(self: &Arc<Self>) -> SignerResult<()> {
        let current = self.state.load_full();
        if let Some(account) = &current.account {
            if !current.connected {
                self.transition(Some(account.clone()), true, None);
            }
            return Ok(());
        }

        let Some(login) = self.login.clone() else {
            tracing::warn!("connect() called without a login flow; supply the account via set_account()");
            return Err(SignerError::NoAccountSource);
        };

        let session = ensure_session(login.as_ref()).await?;
        let organization_id = if current.organization_id.is_empty() {
            session.organization_id.clone()
        } else {
            current.organization_id.clone()
        };

        let wallets = self.remote.list_wallets(&organization_id).await?;
        let wallet = wallets.first().ok_or(SignerError::NoWallets)?;
        let accounts = if wallet.accounts.is_empty() {
            self.remote
                .list_wallet_accounts(&organization_id, &wallet.wallet_id)
                .await?
        } else {
            wallet.accounts.clone()
        };
        let account = accounts
            .into_iter()
            .find(|a| a.is_ethereum())
            .ok_or(SignerError::NoAccounts)?;

        tracing::info!(
            wallet_id = %wallet.wallet_id,
            address = %account.address,
            "Connected remote account"
        );
        self.transition(Some(account), true, Some(organization_id));
        Ok(())
    }

    /// Swap in a new connection state and schedule its descriptor.
    fn transition(
        self: &Arc<Self>,
        account: Option<WalletAccount>,
        connected: bool,
        organization_id: Option<String>,
    ) {
        let advance = |cur: &ConnectionState| ConnectionState {
            generation: cur.generation + 1,
            account: account.clone(),
            connected,
            organization_id: organization_id
                .clone()
                .unwrap_or_else(|| cur.organization_id.clone()),
        };
        let previous = self.state.rcu(|cur| advance(cur));
        let next = advance(&previous);
        let generation = next.generation;

        match (&next.account, next.connected) {
            (Some(account), true) => {
                let inner = self.clone();
                let account = account.clone();
                let organization_id = next.organization_id.clone();
                self.runtime.spawn(async move {
                    let descriptor = inner.build_descriptor(account, organization_id).await;
                    inner.commit(generation, descriptor);
                });
            }
            _ => {
                metrics::record_descriptor_rebuild("disconnected");
                self.commit(generation, self.placeholder());
            }
        }
    }

    async fn build_descriptor(self: &Arc<Self>, account: WalletAccount, organization_id: String) -> SignerDescriptor {
        match self.try_build_descriptor(&account, organization_id).await {
            Ok(descriptor) => {
                metrics::record_descriptor_rebuild("connected");
                descriptor
            }
            Err(e) => {
                metrics::record_descriptor_rebuild("failed");
                tracing::error!(
                    address = %account.address,
                    error = %e,
                    "Failed to build signer descriptor"
                );
                self.placeholder()
            }
        }
    }

    async fn try_build_descriptor(
        self: &Arc<Self>,
        account: &WalletAccount,
        organization_id: String,
    ) -> SignerResult<SignerDescriptor> {
        let public_key = account
            .public_key
            .as_deref()
            .ok_or(SignerError::MissingPublicKey)?;
        let key = public_key_bytes(public_key)?;
        let sdk = self.sdk.load().await?;
        let commitment = sdk.public_key_commitment(&key)?;

        let sign_cb = turnkey_sign_callback(SigningContext {
            remote: self.remote.clone(),
            organization_id,
            account: account.clone(),
            sdk: self.sdk.clone(),
        });

        Ok(SignerDescriptor {
            sign_cb,
            account_config: Some(SignerAccountConfig {
                public_key_commitment: commitment.to_vec(),
                account_type: self.options.account_type,
                storage_mode: self.options.storage_mode,
                account_seed: account_seed_from_str(self.options.account_seed.as_deref()),
            }),
            store_name: store_name(&account.address),
            name: SIGNER_NAME,
            is_connected: true,
            controls: self.controls(),
        })
    }

    /// Publish `descriptor` unless a newer transition happened meanwhile.
    fn commit(&self, generation: u64, descriptor: SignerDescriptor) -> bool {
        let committed = self.published.send_if_modified(|current| {
            if self.state.load().generation != generation {
                return false;
            }
            *current = Snapshot {
                generation,
                descriptor,
            };
            true
        });
        if !committed {
            metrics::record_descriptor_rebuild("superseded");
            tracing::debug!(generation, "Discarding superseded descriptor rebuild");
        }
        committed
    }

    fn controls(self: &Arc<Self>) -> SignerControls {
        SignerControls {
            inner: Arc::downgrade(self),
        }
    }

    fn placeholder(self: &Arc<Self>) -> SignerDescriptor {
        SignerDescriptor::disconnected(self.controls())
    }
}

impl std::fmt::Debug for TurnkeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.load();
        f.debug_struct("TurnkeySigner")
            .field("client", &self.inner.remote)
            .field("generation", &state.generation)
            .field("account", &state.account.as_ref().map(|a| a.address.as_str()))
            .field("connected", &state.connected)
            .finish()
    }
}
