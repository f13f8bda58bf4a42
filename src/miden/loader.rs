//! Explicit client SDK loading.
//!
//! # Design Decisions
//! - The SDK starts `NotLoaded`; `load()` is the only transition to `Loaded`
//! - Concurrent `load()` calls share one initialization
//! - A failed load leaves the loader `NotLoaded` so it can be retried

use futures_util::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::miden::sdk::MidenSdk;
use crate::miden::types::{MidenError, MidenResult};

type SdkFactory = Box<dyn Fn() -> BoxFuture<'static, MidenResult<Arc<dyn MidenSdk>>> + Send + Sync>;

/// Observable loading state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkState {
    NotLoaded,
    Loaded,
}

/// Loads the client SDK on demand and caches it.
pub struct SdkLoader {
    factory: SdkFactory,
    sdk: OnceCell<Arc<dyn MidenSdk>>,
}

impl SdkLoader {
    /// Create a loader that runs `factory` on first `load()`.
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = MidenResult<Arc<dyn MidenSdk>>> + Send + 'static,
    {
        Self {
            factory: Box::new(move || factory().boxed()),
            sdk: OnceCell::new(),
        }
    }

    /// A loader that is already `Loaded`.
    pub fn preloaded(sdk: Arc<dyn MidenSdk>) -> Self {
        Self {
            factory: Box::new(|| async { Err::<Arc<dyn MidenSdk>, _>(MidenError::Load("factory unused".into())) }.boxed()),
            sdk: OnceCell::new_with(Some(sdk)),
        }
    }

    pub fn state(&self) -> SdkState {
        if self.sdk.initialized() {
            SdkState::Loaded
        } else {
            SdkState::NotLoaded
        }
    }

    /// The loaded SDK, or `NotLoaded` without triggering a load.
    pub fn get(&self) -> MidenResult<Arc<dyn MidenSdk>> {
        self.sdk.get().cloned().ok_or(MidenError::NotLoaded)
    }

    /// Load the SDK if needed and return it.
    pub async fn load(&self) -> MidenResult<Arc<dyn MidenSdk>> {
        let sdk = self
            .sdk
            .get_or_try_init(|| async {
                tracing::debug!("Loading client SDK");
                (self.factory)().await
            })
            .await?;
        Ok(sdk.clone())
    }
}

impl std::fmt::Debug for SdkLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkLoader").field("state", &self.state()).finish()
    }
}
