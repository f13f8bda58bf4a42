//! Client SDK seam.
//!
//! The host supplies an implementation backed by the actual client library;
//! this crate only drives it.

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::sync::Arc;

use crate::crypto::{from_turnkey_signature, Commitment};
use crate::miden::types::{Account, AccountBuildRequest, AccountId, ClientParams, MidenResult};
use crate::signer::SignerError;
use crate::turnkey::RawSignature;

/// Future returned by a keystore signing callback.
pub type SignFuture = BoxFuture<'static, Result<Vec<u8>, SignerError>>;

/// External keystore signing function: `(public key, signing inputs) -> signature`.
pub type SignCallback = Arc<dyn Fn(Vec<u8>, Vec<u8>) -> SignFuture + Send + Sync>;

/// Entry points of the client library.
#[async_trait]
pub trait MidenSdk: Send + Sync {
    /// Deserialize signing inputs and return their commitment as hex.
    fn signing_inputs_commitment(&self, signing_inputs: &[u8]) -> MidenResult<String>;

    /// Commitment the auth component is built from, for a SEC1 public key.
    ///
    /// Defaults to Keccak-256 over the compressed key. Implementations must
    /// override this when the client's auth component expects another scheme.
    fn public_key_commitment(&self, public_key: &[u8]) -> MidenResult<Commitment> {
        Ok(Commitment::from_sec1_bytes(public_key)?)
    }

    /// Encode a remote `(r, s, v)` signature into the bytes the client verifier
    /// accepts.
    ///
    /// Defaults to the 66-byte `[scheme | r | s | v]` layout.
    fn encode_signature(&self, signature: &RawSignature) -> MidenResult<Vec<u8>> {
        Ok(from_turnkey_signature(signature)?)
    }

    /// Build an account description. Pure: no network or store access.
    fn build_account(&self, request: &AccountBuildRequest) -> MidenResult<Account>;

    /// Construct a client whose keystore delegates to `sign`.
    async fn create_client(
        &self,
        params: ClientParams,
        sign: SignCallback,
    ) -> MidenResult<Arc<dyn MidenClient>>;
}

/// A running client instance.
#[async_trait]
pub trait MidenClient: Send + Sync {
    /// Hydrate an account that already exists on-chain.
    async fn import_account_by_id(&self, id: &AccountId) -> MidenResult<()>;

    /// Local copy of an account, if tracked.
    async fn get_account(&self, id: &AccountId) -> MidenResult<Option<Account>>;

    /// Start tracking a new account.
    async fn new_account(&self, account: &Account, overwrite: bool) -> MidenResult<()>;

    async fn sync_state(&self) -> MidenResult<()>;

    /// Release background resources. Fire and forget.
    fn terminate(&self);
}
