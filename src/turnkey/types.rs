//! Remote signing service wire types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Activity type for raw payload signing.
pub const ACTIVITY_TYPE_SIGN_RAW_PAYLOAD_V2: &str = "ACTIVITY_TYPE_SIGN_RAW_PAYLOAD_V2";

/// The only activity status that carries a usable result.
pub const ACTIVITY_STATUS_COMPLETED: &str = "ACTIVITY_STATUS_COMPLETED";

/// Payloads are always sent hex-encoded.
pub const PAYLOAD_ENCODING_HEXADECIMAL: &str = "PAYLOAD_ENCODING_HEXADECIMAL";

/// Payloads are always hashed with Keccak-256 by the remote signer.
pub const HASH_FUNCTION_KECCAK256: &str = "HASH_FUNCTION_KECCAK256";

/// Address format of Ethereum accounts.
pub const ADDRESS_FORMAT_ETHEREUM: &str = "ADDRESS_FORMAT_ETHEREUM";

/// A key held by the remote signing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    /// Address used as `signWith` when signing.
    pub address: String,

    /// Hex-encoded secp256k1 public key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    /// Derivation path, e.g. `m/44'/60'/0'/0/0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl WalletAccount {
    /// Account with only an address and public key.
    pub fn new(address: impl Into<String>, public_key: Option<String>) -> Self {
        Self {
            address: address.into(),
            public_key,
            address_format: None,
            wallet_id: None,
            organization_id: None,
            path: None,
        }
    }

    /// Whether the remote reports this account as Ethereum-formatted.
    pub fn is_ethereum(&self) -> bool {
        self.address_format.as_deref() == Some(ADDRESS_FORMAT_ETHEREUM)
    }
}

/// Where a wallet's keys live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WalletSource {
    /// Keys held by the remote signing service.
    #[default]
    Embedded,
    /// External wallet linked to the user.
    Connected,
}

/// A wallet and the accounts derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub wallet_id: String,

    #[serde(default)]
    pub wallet_name: String,

    #[serde(default)]
    pub source: WalletSource,

    #[serde(default)]
    pub accounts: Vec<WalletAccount>,
}

/// An authenticated session with the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub organization_id: String,

    #[serde(default)]
    pub user_id: Option<String>,

    /// Expiry as seconds since epoch.
    #[serde(default)]
    pub expiry: Option<u64>,
}

/// Signature returned by the remote signer. Components are hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSignature {
    pub r: String,
    pub s: String,
    pub v: String,
}

/// Parameters of a raw payload signing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRawPayloadParams {
    pub sign_with: String,
    pub payload: String,
    pub encoding: String,
    pub hash_function: String,
}

impl SignRawPayloadParams {
    /// Hex payload hashed with Keccak-256, the only encoding the client uses.
    /// The payload is always sent `0x`-prefixed.
    pub fn keccak_hex(sign_with: impl Into<String>, payload_hex: impl Into<String>) -> Self {
        let payload_hex = payload_hex.into();
        let payload = if payload_hex.starts_with("0x") {
            payload_hex
        } else {
            format!("0x{}", payload_hex)
        };
        Self {
            sign_with: sign_with.into(),
            payload,
            encoding: PAYLOAD_ENCODING_HEXADECIMAL.to_string(),
            hash_function: HASH_FUNCTION_KECCAK256.to_string(),
        }
    }
}

/// Activity envelope submitted to the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRawPayloadRequest {
    #[serde(rename = "type")]
    pub activity_type: String,
    pub organization_id: String,
    pub timestamp_ms: String,
    pub parameters: SignRawPayloadParams,
}

impl SignRawPayloadRequest {
    pub fn new(organization_id: impl Into<String>, timestamp_ms: u128, parameters: SignRawPayloadParams) -> Self {
        Self {
            activity_type: ACTIVITY_TYPE_SIGN_RAW_PAYLOAD_V2.to_string(),
            organization_id: organization_id.into(),
            timestamp_ms: timestamp_ms.to_string(),
            parameters,
        }
    }
}

/// Result payload of a completed activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResult {
    #[serde(default)]
    pub sign_raw_payload_result: Option<RawSignature>,
}

/// An asynchronous remote operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default)]
    pub id: String,

    pub status: String,

    #[serde(rename = "type", default)]
    pub activity_type: String,

    #[serde(default)]
    pub result: Option<ActivityResult>,
}

impl Activity {
    pub fn is_completed(&self) -> bool {
        self.status == ACTIVITY_STATUS_COMPLETED
    }
}

/// Response to an activity submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityResponse {
    pub activity: Activity,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListWalletsRequest<'a> {
    pub organization_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListWalletsResponse {
    #[serde(default)]
    pub wallets: Vec<Wallet>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListWalletAccountsRequest<'a> {
    pub organization_id: &'a str,
    pub wallet_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListWalletAccountsResponse {
    #[serde(default)]
    pub accounts: Vec<WalletAccount>,
}

/// Errors that can occur talking to the remote signing service.
#[derive(Debug, Error)]
pub enum TurnkeyError {
    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Activity did not reach the completed state.
    #[error("Invalid activity status: {status}")]
    ActivityStatus { activity_id: String, status: String },

    /// Completed activity without a signature.
    #[error("No signature result in activity {activity_id}")]
    MissingResult { activity_id: String },

    /// Request stamping failed.
    #[error("Stamp error: {0}")]
    Stamp(String),

    /// API key material could not be parsed.
    #[error("Invalid API key: {0}")]
    InvalidKey(String),

    /// Response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Session or login flow failure.
    #[error("Session error: {0}")]
    Session(String),

    /// Base URL or endpoint path invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type for remote service operations.
pub type TurnkeyResult<T> = Result<T, TurnkeyError>;
