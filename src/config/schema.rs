//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::bootstrap::{BootstrapOptions, BootstrapRequest};
use crate::miden::StorageMode;
use crate::turnkey::http::DEFAULT_API_BASE_URL;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AdapterConfig {
    /// Remote signing API settings.
    pub turnkey: TurnkeyApiConfig,

    /// Blockchain client settings.
    pub miden: MidenConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Remote signing API configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TurnkeyApiConfig {
    /// API base URL.
    pub api_base_url: String,

    /// Organization owning the wallets. May be left empty when a session
    /// supplies it.
    pub organization_id: String,

    /// Compressed P-256 API public key (hex). When set, the private key loaded
    /// from the environment must match it.
    pub api_public_key: Option<String>,
}

impl Default for TurnkeyApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            organization_id: String::new(),
            api_public_key: None,
        }
    }
}

/// Blockchain client configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MidenConfig {
    /// Node RPC endpoint.
    pub node_url: String,

    /// Account storage mode (public, private).
    pub storage_mode: StorageMode,

    /// Note transport endpoint.
    pub note_transport_url: Option<String>,

    /// Account builder seed string.
    pub account_seed: Option<String>,

    /// Client RNG seed.
    pub client_seed: Option<String>,
}

impl Default for MidenConfig {
    fn default() -> Self {
        Self {
            node_url: "https://rpc.testnet.miden.io".to_string(),
            storage_mode: StorageMode::Public,
            note_transport_url: None,
            account_seed: None,
            client_seed: None,
        }
    }
}

impl MidenConfig {
    /// Bootstrap inputs described by this section.
    pub fn bootstrap_request(&self, organization_id: &str) -> BootstrapRequest {
        BootstrapRequest {
            node_url: self.node_url.clone(),
            storage_mode: self.storage_mode,
            options: BootstrapOptions {
                account_seed: self.account_seed.clone(),
                note_transport_url: self.note_transport_url.clone(),
                endpoint: None,
                organization_id: Some(organization_id.to_string()).filter(|id| !id.is_empty()),
                client_seed: self.client_seed.clone(),
            },
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
