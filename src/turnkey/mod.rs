//! Remote signing service integration.
//!
//! # Data Flow
//! ```text
//! signing commitment (hex)
//!     → client.rs (RemoteClient: HTTP activity or session shape)
//!     → http.rs (stamped JSON over reqwest) / host session client
//!     → {r, s, v}
//! ```
//!
//! # Security Constraints
//! - API private keys ONLY from environment variables
//! - Never log key material or stamps

pub mod client;
pub mod http;
pub mod login;
pub mod stamper;
pub mod types;

pub use client::{ActivityApi, RemoteClient, SessionApi, WalletDirectory};
pub use http::TurnkeyHttpClient;
pub use login::LoginFlow;
pub use stamper::{ApiKeyStamper, Stamper};
pub use types::{RawSignature, Session, TurnkeyError, TurnkeyResult, Wallet, WalletAccount, WalletSource};
