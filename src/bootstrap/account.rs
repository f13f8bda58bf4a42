//! On-chain account resolution.
//!
//! # Responsibilities
//! - Build the account deterministically from the remote key
//! - Hydrate it from the network when it already exists
//! - Create it locally only when still absent
//!
//! # Design Decisions
//! - Only "account not found" is tolerated on import; other failures surface
//! - Creation never overwrites, so an existing account keeps its nonce

use crate::bootstrap::types::{BootstrapError, BootstrapResult, ClientOptions};
use crate::crypto::{account_seed_from_str, public_key_bytes};
use crate::miden::{AccountBuildRequest, AccountId, MidenClient, MidenSdk};
use crate::observability::metrics;
use crate::turnkey::WalletAccount;

/// Resolve (import or create) the account controlled by `account`'s key.
pub async fn create_account(
    client: &dyn MidenClient,
    sdk: &dyn MidenSdk,
    account: &WalletAccount,
    opts: &ClientOptions,
) -> BootstrapResult<AccountId> {
    let public_key = account
        .public_key
        .as_deref()
        .ok_or_else(|| BootstrapError::MissingPublicKey(account.address.clone()))?;

    client.sync_state().await?;
    let commitment = sdk.public_key_commitment(&public_key_bytes(public_key)?)?;
    let seed = account_seed_from_str(opts.account_seed.as_deref()).unwrap_or([0u8; 32]);

    let built = sdk.build_account(&AccountBuildRequest {
        seed,
        auth_commitment: commitment,
        account_type: opts.account_type,
        storage_mode: opts.storage_mode,
        with_basic_wallet: true,
    })?;

    // An existing public account must be hydrated, not recreated with a zero nonce.
    let mut outcome = "existing";
    if !opts.storage_mode.is_private() {
        match client.import_account_by_id(&built.id).await {
            Ok(()) => {
                outcome = "imported";
                tracing::info!(account_id = %built.id, "Imported account from network");
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(account_id = %built.id, "Account not on chain yet");
            }
            Err(e) => {
                metrics::record_account_resolution("failed");
                return Err(e.into());
            }
        }
    }

    if client.get_account(&built.id).await?.is_none() {
        client.new_account(&built, false).await?;
        outcome = "created";
        tracing::info!(
            account_id = %built.id,
            storage_mode = %opts.storage_mode,
            "Created account"
        );
    }

    client.sync_state().await?;
    metrics::record_account_resolution(outcome);
    Ok(built.id)
}
