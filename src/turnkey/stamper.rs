//! Request stamping for the remote HTTP API.
//!
//! # Security
//! - API private keys are loaded ONLY from environment variables or the caller
//! - Keys are never logged; `Debug` prints the public half only

use async_trait::async_trait;
use base64::prelude::*;
use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::{Signature, SigningKey};
use serde::Serialize;

use crate::turnkey::types::{TurnkeyError, TurnkeyResult};

/// Environment variable holding the hex-encoded API private key.
pub const API_PRIVATE_KEY_ENV_VAR: &str = "TURNKEY_API_PRIVATE_KEY";

/// Header carrying the stamp.
pub const STAMP_HEADER_NAME: &str = "X-Stamp";

/// Signature scheme identifier of P-256 API keys.
pub const SIGNATURE_SCHEME_TK_API_P256: &str = "SIGNATURE_SCHEME_TK_API_P256";

/// Authentication header attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub header_name: String,
    pub header_value: String,
}

/// Produces the authentication stamp for a serialized request body.
#[async_trait]
pub trait Stamper: Send + Sync {
    async fn stamp(&self, payload: &str) -> TurnkeyResult<Stamp>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiKeyStampBody<'a> {
    public_key: &'a str,
    scheme: &'a str,
    signature: String,
}

/// Stamps requests with a P-256 API key.
pub struct ApiKeyStamper {
    key: SigningKey,
    /// Compressed public key, hex.
    public_key: String,
}

impl ApiKeyStamper {
    /// Create a stamper from a hex-encoded P-256 private key.
    pub fn from_private_key(private_key_hex: &str) -> TurnkeyResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
        let bytes = hex::decode(key_hex)
            .map_err(|e| TurnkeyError::InvalidKey(format!("private key is not hex: {}", e)))?;
        let key = SigningKey::from_slice(&bytes)
            .map_err(|e| TurnkeyError::InvalidKey(format!("invalid P-256 scalar: {}", e)))?;
        let public_key = hex::encode(key.verifying_key().to_encoded_point(true).as_bytes());

        Ok(Self { key, public_key })
    }

    /// Load the private key from `TURNKEY_API_PRIVATE_KEY`.
    pub fn from_env() -> TurnkeyResult<Self> {
        let private_key = std::env::var(API_PRIVATE_KEY_ENV_VAR).map_err(|_| {
            TurnkeyError::InvalidKey(format!(
                "Environment variable {} not set",
                API_PRIVATE_KEY_ENV_VAR
            ))
        })?;
        Self::from_private_key(&private_key)
    }

    /// Fail unless the key matches the configured API public key.
    pub fn ensure_public_key(self, expected_hex: &str) -> TurnkeyResult<Self> {
        let expected = expected_hex.strip_prefix("0x").unwrap_or(expected_hex);
        if !expected.eq_ignore_ascii_case(&self.public_key) {
            return Err(TurnkeyError::InvalidKey(format!(
                "private key does not match API public key {}",
                expected
            )));
        }
        Ok(self)
    }

    /// Compressed public key, hex.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }
}

#[async_trait]
impl Stamper for ApiKeyStamper {
    async fn stamp(&self, payload: &str) -> TurnkeyResult<Stamp> {
        let signature: Signature = self.key.sign(payload.as_bytes());
        let body = ApiKeyStampBody {
            public_key: &self.public_key,
            scheme: SIGNATURE_SCHEME_TK_API_P256,
            signature: hex::encode(signature.to_der().as_bytes()),
        };
        let json = serde_json::to_vec(&body).map_err(|e| TurnkeyError::Stamp(e.to_string()))?;

        Ok(Stamp {
            header_name: STAMP_HEADER_NAME.to_string(),
            header_value: BASE64_URL_SAFE_NO_PAD.encode(json),
        })
    }
}

impl std::fmt::Debug for ApiKeyStamper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyStamper")
            .field("public_key", &self.public_key)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::ecdsa::signature::Verifier as _;
    use p256::ecdsa::VerifyingKey;

    const TEST_KEY: &str = "0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a";

    #[tokio::test]
    async fn test_stamp_verifies() {
        let stamper = ApiKeyStamper::from_private_key(TEST_KEY).unwrap();
        let payload = r#"{"organizationId":"org-1"}"#;
        let stamp = stamper.stamp(payload).await.unwrap();
        assert_eq!(stamp.header_name, STAMP_HEADER_NAME);

        let decoded = BASE64_URL_SAFE_NO_PAD.decode(stamp.header_value).unwrap();
        let body: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(body["scheme"], SIGNATURE_SCHEME_TK_API_P256);
        assert_eq!(body["publicKey"], stamper.public_key());

        let der = hex::decode(body["signature"].as_str().unwrap()).unwrap();
        let signature = Signature::from_der(&der).unwrap();
        let public = hex::decode(stamper.public_key()).unwrap();
        let verifying = VerifyingKey::from_sec1_bytes(&public).unwrap();
        assert!(verifying.verify(payload.as_bytes(), &signature).is_ok());
    }

    #[test]
    fn test_public_key_is_compressed() {
        let stamper = ApiKeyStamper::from_private_key(TEST_KEY).unwrap();
        assert_eq!(stamper.public_key().len(), 66);
        let expected = stamper.public_key().to_uppercase();
        assert!(stamper.ensure_public_key(&expected).is_ok());
    }

    #[test]
    fn test_mismatched_public_key_rejected() {
        let stamper = ApiKeyStamper::from_private_key(TEST_KEY).unwrap();
        assert!(stamper.ensure_public_key("02aa").is_err());
    }

    #[test]
    fn test_invalid_private_key() {
        assert!(matches!(
            ApiKeyStamper::from_private_key("not-hex"),
            Err(TurnkeyError::InvalidKey(_))
        ));
        assert!(ApiKeyStamper::from_private_key(&"00".repeat(32)).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let stamper = ApiKeyStamper::from_private_key(TEST_KEY).unwrap();
        let debug = format!("{:?}", stamper);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("5a5a5a5a"));
    }
}
