//! Client construction and lifetime.
//!
//! # Responsibilities
//! - Construct a client whose keystore signs through the remote signer
//! - Pick the remote account and organization for a bootstrap run
//! - Terminate superseded clients

use std::sync::Arc;

use crate::bootstrap::account::create_account;
use crate::bootstrap::types::{
    BootstrapError, BootstrapRequest, BootstrapResult, ClientOptions, LoadedClient, TurnkeyConfig,
};
use crate::miden::{ClientParams, SdkLoader};
use crate::signer::{turnkey_sign_callback, SigningContext};
use crate::turnkey::{RemoteClient, Session, Wallet, WalletAccount, WalletSource};

/// Construct a client signing through `config` and resolve its account.
///
/// The client is terminated again if account resolution fails.
pub async fn create_miden_turnkey_client(
    sdk_loader: Arc<SdkLoader>,
    config: TurnkeyConfig,
    opts: ClientOptions,
) -> BootstrapResult<LoadedClient> {
    let sdk = sdk_loader.load().await?;
    let sign = turnkey_sign_callback(SigningContext {
        remote: config.client.clone(),
        organization_id: config.organization_id.clone(),
        account: config.account.clone(),
        sdk: sdk_loader.clone(),
    });

    let client = sdk
        .create_client(
            ClientParams {
                endpoint: opts.endpoint.clone(),
                note_transport_url: opts.note_transport_url.clone(),
                seed: opts.seed.clone(),
            },
            sign,
        )
        .await?;

    match create_account(client.as_ref(), sdk.as_ref(), &config.account, &opts).await {
        Ok(account_id) => Ok(LoadedClient { client, account_id }),
        Err(e) => {
            client.terminate();
            Err(e)
        }
    }
}

/// Holds at most one live client, replacing it on every `load`.
pub struct ClientBootstrap {
    remote: RemoteClient,
    sdk: Arc<SdkLoader>,
    session: Option<Session>,
    current: Option<LoadedClient>,
}

impl ClientBootstrap {
    pub fn new(remote: RemoteClient, sdk: Arc<SdkLoader>) -> Self {
        Self {
            remote,
            sdk,
            session: None,
            current: None,
        }
    }

    /// Session used to resolve the organization when options carry none.
    pub fn with_session(mut self, session: Option<Session>) -> Self {
        self.session = session;
        self
    }

    pub fn current(&self) -> Option<&LoadedClient> {
        self.current.as_ref()
    }

    /// Build a client for the first embedded wallet account.
    ///
    /// Returns `Ok(None)` when there is no account to sign with, so callers can
    /// prompt the user to connect. The previous client is terminated first.
    pub async fn load(
        &mut self,
        wallets: &[Wallet],
        request: &BootstrapRequest,
    ) -> BootstrapResult<Option<LoadedClient>> {
        self.teardown();

        let Some(account) = first_embedded_account(wallets) else {
            tracing::debug!("No embedded wallet account, skipping client bootstrap");
            return Ok(None);
        };

        let organization_id = request
            .options
            .organization_id
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| self.session.as_ref().map(|s| s.organization_id.clone()))
            .or_else(|| self.remote.session().map(|s| s.organization_id));
        let Some(organization_id) = organization_id else {
            tracing::warn!("No organization ID found");
            return Err(BootstrapError::MissingOrganizationId);
        };

        let endpoint = request.endpoint();

        tracing::info!(
            address = %account.address,
            endpoint = %endpoint,
            storage_mode = %request.storage_mode,
            "Bootstrapping client"
        );

        let loaded = create_miden_turnkey_client(
            self.sdk.clone(),
            TurnkeyConfig {
                client: self.remote.clone(),
                organization_id,
                account: account.clone(),
            },
            ClientOptions {
                endpoint: Some(endpoint),
                note_transport_url: request.options.note_transport_url.clone(),
                seed: request.options.client_seed.clone(),
                account_seed: request.options.account_seed.clone(),
                account_type: Default::default(),
                storage_mode: request.storage_mode,
            },
        )
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to load client"))?;

        self.current = Some(loaded.clone());
        Ok(Some(loaded))
    }

    /// Terminate the live client, if any.
    pub fn teardown(&mut self) {
        if let Some(previous) = self.current.take() {
            tracing::debug!(account_id = %previous.account_id, "Terminating client");
            previous.client.terminate();
        }
    }
}

impl Drop for ClientBootstrap {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// First account of the first embedded wallet; connected wallets are skipped.
pub fn first_embedded_account(wallets: &[Wallet]) -> Option<&WalletAccount> {
    wallets
        .iter()
        .find(|w| w.source == WalletSource::Embedded)
        .and_then(|w| w.accounts.first())
}
