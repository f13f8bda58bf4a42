//! Keystore signing callbacks.

use futures_util::future::FutureExt;
use std::sync::Arc;

use crate::miden::{SdkLoader, SignCallback};
use crate::signer::types::{SignerError, SignerResult};
use crate::turnkey::{RemoteClient, WalletAccount};

/// Everything a signing callback needs to reach the remote signer.
#[derive(Clone)]
pub struct SigningContext {
    pub remote: RemoteClient,
    pub organization_id: String,
    pub account: WalletAccount,
    pub sdk: Arc<SdkLoader>,
}

impl SigningContext {
    /// Sign serialized signing inputs.
    ///
    /// The inputs are reduced to their commitment by the SDK, the commitment
    /// hex is signed remotely, and the SDK re-encodes the `(r, s, v)` reply.
    pub async fn sign(&self, signing_inputs: &[u8]) -> SignerResult<Vec<u8>> {
        let sdk = self.sdk.load().await?;
        let message_hex = sdk.signing_inputs_commitment(signing_inputs)?;
        let signature = self
            .remote
            .sign_raw_payload(&self.organization_id, &self.account.address, &message_hex)
            .await?;
        Ok(sdk.encode_signature(&signature)?)
    }
}

/// Callback that forwards every request to the remote signer.
pub fn turnkey_sign_callback(context: SigningContext) -> SignCallback {
    let context = Arc::new(context);
    Arc::new(move |_public_key: Vec<u8>, signing_inputs: Vec<u8>| {
        let context = context.clone();
        async move { context.sign(&signing_inputs).await }.boxed()
    })
}

/// Callback of a disconnected signer: always fails.
pub fn not_connected_callback() -> SignCallback {
    Arc::new(|_public_key: Vec<u8>, _signing_inputs: Vec<u8>| {
        async { Err::<Vec<u8>, _>(SignerError::NotConnected) }.boxed()
    })
}
