use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chanport_contract::{encode_line, MigrationRequest};
use chanport_pipeline::run_migration;
use chanport_platform::{HttpChatPlatform, DEFAULT_API_BASE};
use chanport_storage::{InMemoryFileRegistry, LocalBlobStore};
use chanport_transfer::{HttpFileTransfer, DEFAULT_TIMEOUT};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Parser)]
#[command(author, version, about = "Channel migration pipeline runner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Migrate one channel or thread into local storage and repost it
    /// through the destination webhook, streaming NDJSON progress on
    /// stdout.
    Run {
        #[arg(long, default_value = "config/chanport.toml")]
        config: PathBuf,
        /// Source channel id (numeric snowflake).
        #[arg(long)]
        channel: String,
        /// Source thread id, when migrating a thread instead of the
        /// whole channel.
        #[arg(long)]
        thread: Option<String>,
        /// Destination webhook URL.
        #[arg(long)]
        webhook: String,
        /// Destination thread id for the webhook posts.
        #[arg(long)]
        dest_thread: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct RuntimeConfig {
    platform: PlatformSection,
    storage: StorageSection,
    #[serde(default)]
    transfer: TransferSection,
    migration: MigrationSection,
}

#[derive(Debug, Clone, Deserialize)]
struct PlatformSection {
    #[serde(default = "default_api_base")]
    api_base: String,
    bot_token: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StorageSection {
    data_dir: PathBuf,
    public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TransferSection {
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct MigrationSection {
    initiated_by: String,
}

impl Default for TransferSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            config,
            channel,
            thread,
            webhook,
            dest_thread,
        } => run(config, channel, thread, webhook, dest_thread).await,
    }
}

async fn run(
    config_path: PathBuf,
    channel: String,
    thread: Option<String>,
    webhook: String,
    dest_thread: Option<String>,
) -> Result<()> {
    let config_source = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config file {}", config_path.display()))?;
    let config: RuntimeConfig = toml::from_str(&config_source)
        .with_context(|| format!("invalid config TOML at {}", config_path.display()))?;

    let request = MigrationRequest {
        bot_token: config.platform.bot_token.clone(),
        source_channel_id: channel,
        source_thread_id: thread,
        destination_webhook_url: webhook,
        destination_thread_id: dest_thread,
        initiated_by: config.migration.initiated_by.clone(),
    };
    request.validate().context("rejecting migration request")?;

    let blobs = LocalBlobStore::open(&config.storage.data_dir)
        .await
        .with_context(|| {
            format!(
                "failed to open blob directory {}",
                config.storage.data_dir.display()
            )
        })?;
    // The production registry is the file-storage service; this runner
    // keeps registrations in memory and reports them in the final stats.
    let registry = Arc::new(InMemoryFileRegistry::new(config.storage.public_base_url.clone()));
    let transfer = HttpFileTransfer::new(
        blobs,
        registry,
        config.migration.initiated_by.clone(),
        Duration::from_secs(config.transfer.timeout_secs),
    )
    .context("failed to build file transfer client")?;
    let platform = HttpChatPlatform::with_api_base(config.platform.api_base.clone());

    info!(
        channel = %request.source_container_id(),
        "starting channel migration"
    );

    let (tx, mut rx) = tokio::sync::mpsc::channel(256);
    let run_request = request.clone();
    let task = tokio::spawn(async move {
        run_migration(&platform, &transfer, &run_request, &tx).await
    });

    let mut stdout = std::io::stdout();
    while let Some(event) = rx.recv().await {
        let line = encode_line(&event).context("failed to encode progress event")?;
        stdout.write_all(line.as_bytes())?;
        stdout.flush()?;
    }

    let outcome = task.await.context("migration task panicked")?;
    let stats = outcome.context("migration run failed")?;
    info!(
        total = stats.total_messages,
        posted = stats.messages_posted,
        files = stats.files_uploaded,
        failures = stats.errors.len(),
        "migration finished"
    );
    Ok(())
}
