//! profile-ledger: document store server and device-side registration CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Run the document store (Pinata credentials from PINATA_KEY / PINATA_SECRET)
//! profile-ledger serve --port 3000
//!
//! # Sign and submit a profile with this device's key
//! profile-ledger publish --name Alex --bio hi --avatar ./me.jpg
//!
//! # Fetch a stored document
//! profile-ledger fetch 0b8f0c3e-5b7a-4c1e-9a43-1f7f4f2c9d10
//!
//! # Print this device's public key
//! profile-ledger whoami
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use profile_ledger::config::{ClientConfig, FromEnv, ServerConfig};
use profile_ledger::custody::{KeyCustody, SqliteSecretStore};
use profile_ledger::pin::{PinataClient, PinataConfig};
use profile_ledger::store::{router, DocumentStore, StoreClient};
use profile_ledger::{AvatarSource, DocId, ProfileInput, ProfileRegistrationFlow};

#[derive(Parser, Debug)]
#[command(name = "profile-ledger")]
#[command(about = "Device-signed profiles on a content-addressed document store")]
#[command(version)]
struct Cli {
    /// Document store base URL
    #[arg(long, global = true, env = "L2_MOCK_HOST")]
    store_url: Option<String>,

    /// Device keystore file
    #[arg(long, global = true, env = "PROFILE_LEDGER_KEYSTORE")]
    keystore: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the document store HTTP server
    Serve {
        /// Listen port
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Reject documents whose signature does not verify
        #[arg(long)]
        verify_signatures: bool,
    },

    /// Sign a profile with the device key and submit it
    Publish {
        /// Display name
        #[arg(long)]
        name: String,

        /// Short biography
        #[arg(long, default_value = "")]
        bio: String,

        /// Avatar image to pin alongside the profile
        #[arg(long)]
        avatar: Option<PathBuf>,
    },

    /// Fetch a stored document by id
    Fetch {
        /// Document id returned by `publish`
        doc_id: DocId,
    },

    /// Print the device public key, creating it on first use
    Whoami,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("profile_ledger=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut client = ClientConfig::from_env()?;
    if let Some(url) = cli.store_url {
        client.store_url = url;
    }
    if let Some(path) = cli.keystore {
        client.keystore_path = path;
    }

    match cli.command {
        Command::Serve {
            port,
            verify_signatures,
        } => {
            let mut server = ServerConfig::from_env()?;
            if let Some(port) = port {
                server.bind.set_port(port);
            }
            server.verify_signatures = verify_signatures;
            serve(server).await
        }
        Command::Publish { name, bio, avatar } => publish(client, name, bio, avatar).await,
        Command::Fetch { doc_id } => fetch(client, doc_id).await,
        Command::Whoami => whoami(client).await,
    }
}

fn pinata_client() -> anyhow::Result<PinataClient> {
    let config = PinataConfig::from_env()?;
    if !config.has_credentials() {
        warn!("PINATA_KEY / PINATA_SECRET not set; pinning requests will fail");
    }
    Ok(PinataClient::new(config)?)
}

fn open_custody(client: &ClientConfig) -> anyhow::Result<KeyCustody<SqliteSecretStore>> {
    let store = SqliteSecretStore::open(&client.keystore_path).with_context(|| {
        format!("failed to open keystore {}", client.keystore_path.display())
    })?;
    Ok(KeyCustody::new(store))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let store = Arc::new(DocumentStore::with_config(
        pinata_client()?,
        config.store_config(),
    ));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(
        addr = %config.bind,
        verify_signatures = config.verify_signatures,
        "document store listening"
    );

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("document store stopped");
    Ok(())
}

async fn publish(
    client: ClientConfig,
    name: String,
    bio: String,
    avatar: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut input = ProfileInput::new(name, bio);
    if let Some(path) = avatar {
        input = input.with_avatar(AvatarSource::from_path(&path).await?);
    }

    let flow = ProfileRegistrationFlow::new(
        open_custody(&client)?,
        pinata_client()?,
        StoreClient::new(&client.store_url, client.request_timeout)?,
    );
    let saved = flow.save_profile(input).await?;

    println!("{}", serde_json::to_string_pretty(&saved)?);
    Ok(())
}

async fn fetch(client: ClientConfig, doc_id: DocId) -> anyhow::Result<()> {
    let store = StoreClient::new(&client.store_url, client.request_timeout)?;
    let record = store.lookup(&doc_id).await?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn whoami(client: ClientConfig) -> anyhow::Result<()> {
    let keypair = open_custody(&client)?.get_or_create_keypair().await?;
    println!("{}", keypair.public_key());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
