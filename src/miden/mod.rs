//! Blockchain client SDK integration.
//!
//! # Data Flow
//! ```text
//! loader.rs (explicit NotLoaded → Loaded)
//!     → sdk.rs MidenSdk (signing inputs, account builder, client factory)
//!     → sdk.rs MidenClient (import, lookup, create, sync, terminate)
//! ```

pub mod loader;
pub mod sdk;
pub mod types;

pub use loader::{SdkLoader, SdkState};
pub use sdk::{MidenClient, MidenSdk, SignCallback, SignFuture};
pub use types::{
    Account, AccountBuildRequest, AccountId, AccountType, ClientParams, MidenError, MidenResult,
    StorageMode,
};
