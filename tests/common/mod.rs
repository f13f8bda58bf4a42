//! Shared utilities for integration testing.
#![allow(dead_code)]

use async_trait::async_trait;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use miden_turnkey::crypto::Commitment;
use miden_turnkey::miden::{
    Account, AccountBuildRequest, AccountId, ClientParams, MidenClient, MidenError, MidenResult,
    MidenSdk, SdkLoader, SignCallback,
};
use miden_turnkey::turnkey::types::{
    Activity, ActivityResponse, ActivityResult, SignRawPayloadParams, SignRawPayloadRequest,
    ACTIVITY_STATUS_COMPLETED, ADDRESS_FORMAT_ETHEREUM,
};
use miden_turnkey::turnkey::{
    ActivityApi, LoginFlow, RawSignature, SessionApi, Session, TurnkeyError, TurnkeyResult, Wallet,
    WalletAccount, WalletDirectory, WalletSource,
};

// ---------------------------------------------------------------------------
// Keys and fixtures
// ---------------------------------------------------------------------------

/// Uncompressed hex public key for the secret scalar `[byte; 32]`.
pub fn public_key_hex(byte: u8) -> String {
    let secret = k256::SecretKey::from_slice(&[byte; 32]).unwrap();
    let point = secret.public_key().to_encoded_point(false);
    format!("0x{}", hex::encode(point.as_bytes()))
}

pub fn eth_account(address: &str, key_byte: u8) -> WalletAccount {
    let mut account = WalletAccount::new(address, Some(public_key_hex(key_byte)));
    account.address_format = Some(ADDRESS_FORMAT_ETHEREUM.to_string());
    account
}

pub fn wallet(id: &str, source: WalletSource, accounts: Vec<WalletAccount>) -> Wallet {
    Wallet {
        wallet_id: id.to_string(),
        wallet_name: format!("{id} wallet"),
        source,
        accounts,
    }
}

pub fn raw_signature(v: &str) -> RawSignature {
    RawSignature {
        r: "11".repeat(32),
        s: "22".repeat(32),
        v: v.to_string(),
    }
}

pub fn session(organization_id: &str) -> Session {
    Session {
        organization_id: organization_id.to_string(),
        user_id: Some("user-1".to_string()),
        expiry: None,
    }
}

/// Poll `check` until it holds or a second passes.
pub async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

// ---------------------------------------------------------------------------
// Mock HTTP backend
// ---------------------------------------------------------------------------

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Start a programmable mock backend on an ephemeral port.
///
/// Every request is recorded and answered with `f(request)`.
pub async fn start_programmable_backend<F, Fut>(
    f: F,
) -> (SocketAddr, Arc<Mutex<Vec<RecordedRequest>>>)
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let log = recorded.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        log.lock().unwrap().push(request.clone());
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, recorded)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

// ---------------------------------------------------------------------------
// Mock remote clients
// ---------------------------------------------------------------------------

/// Activity-shaped remote client.
pub struct MockActivityApi {
    pub status: Mutex<String>,
    pub signature: RawSignature,
    pub delay: Duration,
    pub wallets: Vec<Wallet>,
    pub accounts: Vec<WalletAccount>,
    pub requests: Mutex<Vec<SignRawPayloadRequest>>,
}

impl MockActivityApi {
    pub fn completed(signature: RawSignature) -> Self {
        Self {
            status: Mutex::new(ACTIVITY_STATUS_COMPLETED.to_string()),
            signature,
            delay: Duration::ZERO,
            wallets: Vec::new(),
            accounts: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_status(self, status: &str) -> Self {
        *self.status.lock().unwrap() = status.to_string();
        self
    }

    pub fn with_wallets(mut self, wallets: Vec<Wallet>, accounts: Vec<WalletAccount>) -> Self {
        self.wallets = wallets;
        self.accounts = accounts;
        self
    }

    pub fn sign_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl WalletDirectory for MockActivityApi {
    async fn list_wallets(&self, _organization_id: &str) -> TurnkeyResult<Vec<Wallet>> {
        Ok(self.wallets.clone())
    }

    async fn list_wallet_accounts(
        &self,
        _organization_id: &str,
        _wallet_id: &str,
    ) -> TurnkeyResult<Vec<WalletAccount>> {
        Ok(self.accounts.clone())
    }
}

#[async_trait]
impl ActivityApi for MockActivityApi {
    async fn sign_raw_payload(
        &self,
        request: &SignRawPayloadRequest,
    ) -> TurnkeyResult<ActivityResponse> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.requests.lock().unwrap().push(request.clone());
        let status = self.status.lock().unwrap().clone();
        let completed = status == ACTIVITY_STATUS_COMPLETED;
        Ok(ActivityResponse {
            activity: Activity {
                id: format!("act-{}", self.sign_count()),
                status,
                activity_type: request.activity_type.clone(),
                result: completed.then(|| ActivityResult {
                    sign_raw_payload_result: Some(self.signature.clone()),
                }),
            },
        })
    }
}

/// Session-shaped remote client.
pub struct MockSessionApi {
    pub signature: RawSignature,
    pub session: Option<Session>,
    pub wallets: Vec<Wallet>,
    pub params: Mutex<Vec<SignRawPayloadParams>>,
}

impl MockSessionApi {
    pub fn new(signature: RawSignature, session: Option<Session>) -> Self {
        Self {
            signature,
            session,
            wallets: Vec::new(),
            params: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WalletDirectory for MockSessionApi {
    async fn list_wallets(&self, _organization_id: &str) -> TurnkeyResult<Vec<Wallet>> {
        Ok(self.wallets.clone())
    }

    async fn list_wallet_accounts(
        &self,
        _organization_id: &str,
        _wallet_id: &str,
    ) -> TurnkeyResult<Vec<WalletAccount>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl SessionApi for MockSessionApi {
    async fn sign_raw_payload(&self, params: &SignRawPayloadParams) -> TurnkeyResult<RawSignature> {
        self.params.lock().unwrap().push(params.clone());
        Ok(self.signature.clone())
    }

    fn session(&self) -> Option<Session> {
        self.session.clone()
    }
}

/// Login flow with a fixed session.
pub struct MockLogin {
    pub session: Option<Session>,
    pub passkey_logins: AtomicUsize,
}

impl MockLogin {
    pub fn logged_in(organization_id: &str) -> Self {
        Self {
            session: Some(session(organization_id)),
            passkey_logins: AtomicUsize::new(0),
        }
    }

    pub fn logged_out() -> Self {
        Self {
            session: None,
            passkey_logins: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LoginFlow for MockLogin {
    async fn init_key_pair(&self) -> TurnkeyResult<()> {
        Ok(())
    }

    async fn current_session(&self) -> TurnkeyResult<Option<Session>> {
        Ok(self.session.clone())
    }

    async fn login_with_passkey(&self) -> TurnkeyResult<Session> {
        self.passkey_logins.fetch_add(1, Ordering::SeqCst);
        Err(TurnkeyError::Session("passkey login cancelled".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Mock client SDK
// ---------------------------------------------------------------------------

/// How the mock client answers `import_account_by_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportBehavior {
    /// Accounts in `on_chain` import; others are not found.
    Network,
    /// Every import fails with an RPC error.
    RpcFailure,
}

pub struct MockClient {
    pub params: ClientParams,
    pub sign: SignCallback,
    pub import: ImportBehavior,
    pub on_chain: HashSet<AccountId>,
    pub accounts: Mutex<HashMap<AccountId, Account>>,
    pub calls: Mutex<Vec<String>>,
    pub terminated: AtomicBool,
}

impl MockClient {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MidenClient for MockClient {
    async fn import_account_by_id(&self, id: &AccountId) -> MidenResult<()> {
        self.record(format!("import:{id}"));
        match self.import {
            ImportBehavior::RpcFailure => Err(MidenError::Rpc("node unavailable".to_string())),
            ImportBehavior::Network if self.on_chain.contains(id) => {
                self.accounts.lock().unwrap().insert(
                    id.clone(),
                    Account {
                        id: id.clone(),
                        account_type: Default::default(),
                        storage_mode: Default::default(),
                        nonce: 7,
                    },
                );
                Ok(())
            }
            ImportBehavior::Network => Err(MidenError::AccountNotFound(id.clone())),
        }
    }

    async fn get_account(&self, id: &AccountId) -> MidenResult<Option<Account>> {
        self.record(format!("get:{id}"));
        Ok(self.accounts.lock().unwrap().get(id).cloned())
    }

    async fn new_account(&self, account: &Account, overwrite: bool) -> MidenResult<()> {
        self.record(format!("new:{}:{overwrite}", account.id));
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&account.id) && !overwrite {
            return Err(MidenError::Store(format!("account {} exists", account.id)));
        }
        accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn sync_state(&self) -> MidenResult<()> {
        if self.is_terminated() {
            return Err(MidenError::Terminated);
        }
        self.record("sync");
        Ok(())
    }

    fn terminate(&self) {
        self.terminated.store(true, Ordering::SeqCst);
    }
}

/// Commitment returned by a [`MockSdk`] with its own key encoding.
pub const CUSTOM_COMMITMENT: [u8; 32] = [0x5a; 32];

/// Marker prepended to signatures by a [`MockSdk`] with its own encoding.
pub const CUSTOM_SIGNATURE_PREFIX: u8 = 0xee;

/// SDK double: account ids are a function of commitment, seed and storage mode.
pub struct MockSdk {
    pub import: ImportBehavior,
    pub custom_encoding: bool,
    pub on_chain: Mutex<HashSet<AccountId>>,
    pub clients: Mutex<Vec<Arc<MockClient>>>,
}

impl MockSdk {
    pub fn new(import: ImportBehavior) -> Self {
        Self {
            import,
            custom_encoding: false,
            on_chain: Mutex::new(HashSet::new()),
            clients: Mutex::new(Vec::new()),
        }
    }

    /// Use a fixed commitment and a 67-byte signature encoding.
    pub fn with_custom_encoding(mut self) -> Self {
        self.custom_encoding = true;
        self
    }

    pub fn account_id(request: &AccountBuildRequest) -> AccountId {
        AccountId(format!(
            "0x{}{}{}",
            &request.auth_commitment.to_hex()[2..18],
            hex::encode(&request.seed[..4]),
            request.storage_mode.as_str()
        ))
    }

    pub fn last_client(&self) -> Arc<MockClient> {
        self.clients.lock().unwrap().last().cloned().unwrap()
    }

    pub fn client_count(&self) -> usize {
        self.clients.lock().unwrap().len()
    }
}

#[async_trait]
impl MidenSdk for MockSdk {
    fn signing_inputs_commitment(&self, signing_inputs: &[u8]) -> MidenResult<String> {
        if signing_inputs.is_empty() {
            return Err(MidenError::SigningInputs("empty".to_string()));
        }
        Ok(format!("0x{}", hex::encode(signing_inputs)))
    }

    fn public_key_commitment(&self, public_key: &[u8]) -> MidenResult<Commitment> {
        if self.custom_encoding {
            return Ok(Commitment::from_bytes(CUSTOM_COMMITMENT));
        }
        Ok(Commitment::from_sec1_bytes(public_key)?)
    }

    fn encode_signature(&self, signature: &RawSignature) -> MidenResult<Vec<u8>> {
        let encoded = miden_turnkey::crypto::from_turnkey_signature(signature)?;
        if !self.custom_encoding {
            return Ok(encoded);
        }
        let mut out = Vec::with_capacity(encoded.len() + 1);
        out.push(CUSTOM_SIGNATURE_PREFIX);
        out.extend(encoded);
        Ok(out)
    }

    fn build_account(&self, request: &AccountBuildRequest) -> MidenResult<Account> {
        Ok(Account {
            id: Self::account_id(request),
            account_type: request.account_type,
            storage_mode: request.storage_mode,
            nonce: 0,
        })
    }

    async fn create_client(
        &self,
        params: ClientParams,
        sign: SignCallback,
    ) -> MidenResult<Arc<dyn MidenClient>> {
        let client = Arc::new(MockClient {
            params,
            sign,
            import: self.import,
            on_chain: self.on_chain.lock().unwrap().clone(),
            accounts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            terminated: AtomicBool::new(false),
        });
        self.clients.lock().unwrap().push(client.clone());
        Ok(client)
    }
}

/// A loader that takes `delay` to produce `sdk`.
pub fn slow_loader(sdk: Arc<MockSdk>, delay: Duration) -> Arc<SdkLoader> {
    Arc::new(SdkLoader::new(move || {
        let sdk = sdk.clone();
        async move {
            tokio::time::sleep(delay).await;
            Ok(sdk as Arc<dyn MidenSdk>)
        }
    }))
}
