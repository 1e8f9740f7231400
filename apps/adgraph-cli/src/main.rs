//! `adgraph` command-line tool: fetch, upload and list ad videos.

mod commands;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use adgraph_advideos::VideoService;
use adgraph_client::{Client, ClientConfig, ConfigError};

#[derive(Debug, Parser)]
#[command(name = "adgraph", version, about = "Work with ad account videos")]
struct Cli {
    /// Config file (defaults to ~/.config/adgraph/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one video as JSON.
    Get { id: String },

    /// Upload a video file into an ad account.
    Upload {
        /// Ad account id, without the `act_` prefix.
        #[arg(long)]
        account: String,

        /// Video title (defaults to the file name without extension).
        #[arg(long)]
        title: Option<String>,

        file: PathBuf,
    },

    /// Stream every video of an ad account as JSON lines.
    List {
        #[arg(long)]
        account: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,adgraph=debug")),
        )
        .init();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    config.validate()?;
    tracing::debug!(?config, "configuration loaded");

    let client = Client::new(&config).context("failed to create Graph client")?;
    let service = VideoService::new(Arc::new(client));

    let cancel = service.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling");
            cancel.cancel();
        }
    });

    match cli.command {
        Command::Get { id } => commands::get(&service, &id).await,
        Command::Upload {
            account,
            title,
            file,
        } => commands::upload(&service, &account, title.as_deref(), &file).await,
        Command::List { account } => commands::list(&service, &account).await,
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ClientConfig> {
    match path {
        Some(path) => {
            let mut config = ClientConfig::load_from(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            config.apply_env(|key| std::env::var(key).ok());
            Ok(config)
        }
        None => match ClientConfig::load() {
            Ok(config) => Ok(config),
            Err(ConfigError::NoConfigDir) => {
                let mut config = ClientConfig::default();
                config.apply_env(|key| std::env::var(key).ok());
                Ok(config)
            }
            Err(e) => Err(e).context("failed to load configuration"),
        },
    }
}
