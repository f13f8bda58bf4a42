//! HTTP client for the remote signing API.
//!
//! # Responsibilities
//! - Serialize and stamp every request body
//! - Submit signing activities and wallet queries
//! - Map non-success responses to typed errors

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

use crate::turnkey::client::{ActivityApi, WalletDirectory};
use crate::turnkey::stamper::Stamper;
use crate::turnkey::types::{
    ActivityResponse, ListWalletAccountsRequest, ListWalletAccountsResponse, ListWalletsRequest,
    ListWalletsResponse, SignRawPayloadRequest, TurnkeyError, TurnkeyResult, Wallet,
    WalletAccount,
};

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.turnkey.com";

const SIGN_RAW_PAYLOAD_PATH: &str = "/public/v1/submit/sign_raw_payload";
const LIST_WALLETS_PATH: &str = "/public/v1/query/list_wallets";
const LIST_WALLET_ACCOUNTS_PATH: &str = "/public/v1/query/list_wallet_accounts";

/// Stamped JSON client for the remote signing API.
#[derive(Clone)]
pub struct TurnkeyHttpClient {
    http: Client,
    base_url: Url,
    stamper: Arc<dyn Stamper>,
}

impl TurnkeyHttpClient {
    /// Create a client for `base_url`.
    pub fn new(base_url: &str, stamper: Arc<dyn Stamper>) -> TurnkeyResult<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: Url::parse(base_url)?,
            stamper,
        })
    }

    /// Use a preconfigured reqwest client.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> TurnkeyResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        let payload = serde_json::to_string(body)?;
        let stamp = self.stamper.stamp(&payload).await?;

        let response = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(stamp.header_name.as_str(), stamp.header_value.as_str())
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(path = %path, status = status.as_u16(), "Remote API returned error");
            return Err(TurnkeyError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Pull `message` out of a JSON error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl WalletDirectory for TurnkeyHttpClient {
    async fn list_wallets(&self, organization_id: &str) -> TurnkeyResult<Vec<Wallet>> {
        let response: ListWalletsResponse = self
            .post(LIST_WALLETS_PATH, &ListWalletsRequest { organization_id })
            .await?;
        Ok(response.wallets)
    }

    async fn list_wallet_accounts(
        &self,
        organization_id: &str,
        wallet_id: &str,
    ) -> TurnkeyResult<Vec<WalletAccount>> {
        let response: ListWalletAccountsResponse = self
            .post(
                LIST_WALLET_ACCOUNTS_PATH,
                &ListWalletAccountsRequest {
                    organization_id,
                    wallet_id,
                },
            )
            .await?;
        Ok(response.accounts)
    }
}

#[async_trait]
impl ActivityApi for TurnkeyHttpClient {
    async fn sign_raw_payload(&self, request: &SignRawPayloadRequest) -> TurnkeyResult<ActivityResponse> {
        self.post(SIGN_RAW_PAYLOAD_PATH, request).await
    }
}

impl std::fmt::Debug for TurnkeyHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnkeyHttpClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
