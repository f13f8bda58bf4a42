//! In-process login flow.
//!
//! Hosts that manage authentication themselves skip this and hand accounts to
//! the signer directly.

use async_trait::async_trait;

use crate::turnkey::types::{Session, TurnkeyResult};

/// Session establishment against the remote service.
#[async_trait]
pub trait LoginFlow: Send + Sync {
    /// Prepare the local key pair the session is bound to.
    async fn init_key_pair(&self) -> TurnkeyResult<()>;

    /// The session restored from storage, if still valid.
    async fn current_session(&self) -> TurnkeyResult<Option<Session>>;

    /// Interactive passkey login.
    async fn login_with_passkey(&self) -> TurnkeyResult<Session>;
}

/// Reuse an existing session or fall back to passkey login.
pub async fn ensure_session(login: &dyn LoginFlow) -> TurnkeyResult<Session> {
    login.init_key_pair().await?;
    if let Some(session) = login.current_session().await? {
        tracing::debug!(organization_id = %session.organization_id, "Reusing existing session");
        return Ok(session);
    }
    tracing::info!("No active session, starting passkey login");
    login.login_with_passkey().await
}
