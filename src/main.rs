//! Operator CLI for the Turnkey signer adapter.
//!
//! ```text
//! miden-turnkey [--config adapter.toml] <command>
//!
//!   commitment --public-key <hex> [--address <addr>]
//!   wallets
//!   sign --address <addr> --payload <hex>
//!   plan
//! ```
//!
//! The API private key is read from `TURNKEY_API_PRIVATE_KEY`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use miden_turnkey::bootstrap::first_embedded_account;
use miden_turnkey::config::{load_config, AdapterConfig};
use miden_turnkey::crypto::{
    account_seed_from_str, evm_public_key_to_commitment, from_turnkey_signature,
};
use miden_turnkey::observability::{init_logging, init_metrics};
use miden_turnkey::signer::store_name;
use miden_turnkey::turnkey::{ApiKeyStamper, RemoteClient, TurnkeyHttpClient};

#[derive(Parser)]
#[command(name = "miden-turnkey")]
#[command(about = "Inspect and exercise the Turnkey signer for Miden accounts", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the account auth commitment for a public key
    Commitment {
        #[arg(long)]
        public_key: String,

        /// Also print the store name for this address
        #[arg(long)]
        address: Option<String>,
    },
    /// List wallets and accounts of the configured organization
    Wallets,
    /// Sign a hex payload with a remote key
    Sign {
        #[arg(long)]
        address: String,

        #[arg(long)]
        payload: String,
    },
    /// Show the account and client settings a bootstrap would use
    Plan,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AdapterConfig::default(),
    };

    init_logging(&config.observability.log_level, config.observability.json_logs);
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    match cli.command {
        Commands::Commitment {
            public_key,
            address,
        } => {
            let commitment = evm_public_key_to_commitment(&public_key)?;
            println!("commitment: {}", commitment.to_hex());
            if let Some(address) = address {
                println!("store name: {}", store_name(&address));
            }
        }
        Commands::Wallets => {
            let remote = remote_client(&config)?;
            let organization_id = require_organization(&config)?;
            let wallets = remote.fetch_wallets(organization_id).await?;
            println!("{}", serde_json::to_string_pretty(&wallets)?);
        }
        Commands::Sign { address, payload } => {
            let remote = remote_client(&config)?;
            let organization_id = require_organization(&config)?;
            let raw = remote
                .sign_raw_payload(organization_id, &address, &payload)
                .await?;
            let encoded = from_turnkey_signature(&raw)?;

            println!("r: {}", raw.r);
            println!("s: {}", raw.s);
            println!("v: {}", raw.v);
            println!("signature: 0x{}", hex::encode(encoded));
        }
        Commands::Plan => {
            let remote = remote_client(&config)?;
            let organization_id = require_organization(&config)?;
            let wallets = remote.fetch_wallets(organization_id).await?;
            let request = config.miden.bootstrap_request(organization_id);

            let Some(account) = first_embedded_account(&wallets) else {
                println!("no embedded wallet account; nothing to bootstrap");
                return Ok(());
            };
            let seed = account_seed_from_str(request.options.account_seed.as_deref())
                .unwrap_or([0u8; 32]);

            println!("address: {}", account.address);
            println!("store name: {}", store_name(&account.address));
            match account.public_key.as_deref() {
                Some(key) => println!("commitment: {}", evm_public_key_to_commitment(key)?.to_hex()),
                None => println!("commitment: <account has no public key>"),
            }
            println!("endpoint: {}", request.endpoint());
            println!("storage mode: {}", request.storage_mode);
            println!("account seed: 0x{}", hex::encode(seed));
            if let Some(url) = &request.options.note_transport_url {
                println!("note transport: {}", url);
            }
        }
    }

    Ok(())
}

fn remote_client(config: &AdapterConfig) -> Result<RemoteClient, Box<dyn std::error::Error>> {
    let mut stamper = ApiKeyStamper::from_env()?;
    if let Some(expected) = &config.turnkey.api_public_key {
        stamper = stamper.ensure_public_key(expected)?;
    }

    let client = TurnkeyHttpClient::new(&config.turnkey.api_base_url, Arc::new(stamper))?;
    tracing::info!(base_url = %client.base_url(), "Using Turnkey HTTP API");
    Ok(RemoteClient::Http(Arc::new(client)))
}

fn require_organization(config: &AdapterConfig) -> Result<&str, Box<dyn std::error::Error>> {
    if config.turnkey.organization_id.is_empty() {
        return Err("turnkey.organization_id must be set for this command".into());
    }
    Ok(&config.turnkey.organization_id)
}
