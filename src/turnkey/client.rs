//! Remote signing client seam.
//!
//! # Responsibilities
//! - Model the two client shapes the signing service ships
//! - Provide one `sign_raw_payload` capability over both
//! - Enumerate wallets and their accounts
//!
//! # Design Decisions
//! - Shapes are an enum; dispatch is on the variant, never on runtime inspection
//! - The activity form only yields a signature once its status is completed
//! - No timeout or retry is layered on top of the remote call

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::observability::metrics;
use crate::turnkey::types::{
    ActivityResponse, RawSignature, Session, SignRawPayloadParams, SignRawPayloadRequest,
    TurnkeyError, TurnkeyResult, Wallet, WalletAccount,
};

/// Wallet and account enumeration.
#[async_trait]
pub trait WalletDirectory: Send + Sync {
    async fn list_wallets(&self, organization_id: &str) -> TurnkeyResult<Vec<Wallet>>;

    async fn list_wallet_accounts(
        &self,
        organization_id: &str,
        wallet_id: &str,
    ) -> TurnkeyResult<Vec<WalletAccount>>;
}

/// Raw API client: signing is submitted as an activity.
#[async_trait]
pub trait ActivityApi: WalletDirectory {
    async fn sign_raw_payload(&self, request: &SignRawPayloadRequest) -> TurnkeyResult<ActivityResponse>;
}

/// Session-scoped client: signing returns the signature directly.
#[async_trait]
pub trait SessionApi: WalletDirectory {
    async fn sign_raw_payload(&self, params: &SignRawPayloadParams) -> TurnkeyResult<RawSignature>;

    /// Active session, if the user is logged in.
    fn session(&self) -> Option<Session>;
}

/// A handle to the remote signing service.
#[derive(Clone)]
pub enum RemoteClient {
    /// Raw HTTP client returning activities.
    Http(Arc<dyn ActivityApi>),
    /// Session client returning signatures directly.
    Session(Arc<dyn SessionApi>),
}

impl RemoteClient {
    /// Label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteClient::Http(_) => "http",
            RemoteClient::Session(_) => "session",
        }
    }

    /// Active session reported by the client, if any.
    pub fn session(&self) -> Option<Session> {
        match self {
            RemoteClient::Http(_) => None,
            RemoteClient::Session(api) => api.session(),
        }
    }

    /// Sign a hex payload with `sign_with`, hashing with Keccak-256 remotely.
    pub async fn sign_raw_payload(
        &self,
        organization_id: &str,
        sign_with: &str,
        payload_hex: &str,
    ) -> TurnkeyResult<RawSignature> {
        let params = SignRawPayloadParams::keccak_hex(sign_with, payload_hex);
        let start = Instant::now();

        let result = match self {
            RemoteClient::Http(api) => {
                let request = SignRawPayloadRequest::new(organization_id, now_millis(), params);
                let response = api.sign_raw_payload(&request).await;
                response.and_then(signature_from_activity)
            }
            RemoteClient::Session(api) => api.sign_raw_payload(&params).await,
        };

        metrics::record_signing(self.kind(), result.is_ok(), start);
        match &result {
            Ok(_) => tracing::debug!(
                client = self.kind(),
                sign_with = %sign_with,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Remote signing completed"
            ),
            Err(e) => tracing::warn!(
                client = self.kind(),
                sign_with = %sign_with,
                error = %e,
                "Remote signing failed"
            ),
        }
        result
    }

    pub async fn list_wallets(&self, organization_id: &str) -> TurnkeyResult<Vec<Wallet>> {
        match self {
            RemoteClient::Http(api) => api.list_wallets(organization_id).await,
            RemoteClient::Session(api) => api.list_wallets(organization_id).await,
        }
    }

    /// List wallets and fill in each wallet's accounts.
    pub async fn fetch_wallets(&self, organization_id: &str) -> TurnkeyResult<Vec<Wallet>> {
        let mut wallets = self.list_wallets(organization_id).await?;
        for wallet in wallets.iter_mut() {
            if wallet.accounts.is_empty() {
                wallet.accounts = self
                    .list_wallet_accounts(organization_id, &wallet.wallet_id)
                    .await?;
            }
        }
        tracing::debug!(
            organization_id = %organization_id,
            wallets = wallets.len(),
            "Fetched wallets"
        );
        Ok(wallets)
    }

    pub async fn list_wallet_accounts(
        &self,
        organization_id: &str,
        wallet_id: &str,
    ) -> TurnkeyResult<Vec<WalletAccount>> {
        match self {
            RemoteClient::Http(api) => api.list_wallet_accounts(organization_id, wallet_id).await,
            RemoteClient::Session(api) => api.list_wallet_accounts(organization_id, wallet_id).await,
        }
    }
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RemoteClient").field(&self.kind()).finish()
    }
}

/// Extract the signature from an activity, requiring the completed status.
pub fn signature_from_activity(response: ActivityResponse) -> TurnkeyResult<RawSignature> {
    let activity = response.activity;
    if !activity.is_completed() {
        return Err(TurnkeyError::ActivityStatus {
            activity_id: activity.id,
            status: activity.status,
        });
    }
    activity
        .result
        .and_then(|r| r.sign_raw_payload_result)
        .ok_or(TurnkeyError::MissingResult {
            activity_id: activity.id,
        })
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
