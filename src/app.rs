//! Command-line surface: argument parsing and the per-command runners.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::client::HttpApi;
use crate::config::{
    config_dir, default_data_file, load_or_create_voter_token, AppConfig, ClientConfig,
};
use crate::cors::clean_origins;
use crate::item::ItemId;
use crate::logging::get_log_file_path;
use crate::server::{self, shutdown_signal, AppState};
use crate::store::ItemStore;
use crate::sync::{
    AddOutcome, Controller, RefreshOutcome, SyncSettings, TerminalView, TokioScheduler, VoteOutcome,
};

/// Bubble Vote - add items, vote on them, watch the bubbles grow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Config file (default: ~/.bubble-vote/config.toml)
    #[arg(long, env = "BUBBLE_VOTE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable JSON log format (for production/log aggregation)
    #[arg(long, env = "BUBBLE_VOTE_LOG_JSON", default_value = "false", global = true)]
    pub log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "BUBBLE_VOTE_LOG_ROTATION", default_value = "daily", global = true)]
    pub log_rotation: String,

    /// Custom log directory (default: ~/.bubble-vote/logs)
    #[arg(long, env = "BUBBLE_VOTE_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the item service
    Serve(ServeArgs),
    /// Show the live board, polling the server
    Watch(ClientArgs),
    /// Add an item
    Add {
        #[command(flatten)]
        client: ClientArgs,
        name: String,
    },
    /// Vote for an item by id
    Vote {
        #[command(flatten)]
        client: ClientArgs,
        id: ItemId,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Address to bind the server to (default: 0.0.0.0:5000)
    #[arg(short, long, env = "BUBBLE_VOTE_ADDR")]
    pub addr: Option<String>,

    /// Snapshot file (default: ~/.bubble-vote/items.json)
    #[arg(long, env = "BUBBLE_VOTE_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Keep items in memory only
    #[arg(long, env = "BUBBLE_VOTE_IN_MEMORY")]
    pub in_memory: bool,

    /// Comma-separated list of allowed CORS origins.
    /// Use "*" to allow all origins (not recommended for production).
    #[arg(long, env = "BUBBLE_VOTE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    /// Disable the daily reset
    #[arg(long)]
    pub no_reset: bool,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ClientArgs {
    /// Base URL of the item service
    #[arg(long, env = "BUBBLE_VOTE_SERVER")]
    pub server: Option<String>,

    /// Voter identity to present instead of the one saved in `~/.bubble-vote/voter_token`
    #[arg(long, env = "BUBBLE_VOTE_VOTER_TOKEN")]
    pub voter_token: Option<String>,
}

impl ServeArgs {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(addr) = self.addr {
            config.server.addr = addr;
        }
        if let Some(path) = self.data_file {
            config.server.data_file = Some(path);
        }
        if self.in_memory {
            config.server.in_memory = true;
        }
        if let Some(origins) = self.cors_origins {
            config.server.cors_origins = origins;
        }
        if self.no_reset {
            config.reset.enabled = false;
        }
    }
}

impl ClientArgs {
    pub fn apply(self, config: &mut ClientConfig) {
        if let Some(server) = self.server {
            config.server_url = server;
        }
        if let Some(token) = self.voter_token {
            config.voter_token = Some(token);
        }
    }
}

impl Command {
    /// Whether this command owns the terminal (client commands) or not.
    #[must_use]
    pub const fn is_server(&self) -> bool {
        matches!(self, Self::Serve(_))
    }
}

/// Run `command` against the file configuration `config`.
pub async fn run(command: Command, mut config: AppConfig) -> Result<()> {
    match command {
        Command::Serve(flags) => {
            flags.apply(&mut config);
            run_serve(&config).await
        }
        Command::Watch(flags) => {
            flags.apply(&mut config.client);
            run_watch(&config).await
        }
        Command::Add { client, name } => {
            client.apply(&mut config.client);
            run_add(&config, &name).await
        }
        Command::Vote { client, id } => {
            client.apply(&mut config.client);
            run_vote(&config, id).await
        }
    }
}

pub async fn run_serve(config: &AppConfig) -> Result<()> {
    let reset = config.reset.daily_reset()?;
    if let Some(reset) = reset {
        info!("Daily reset at {} (UTC{})", reset.at(), reset.offset());
    }

    let store = if config.server.in_memory {
        info!("Keeping items in memory only");
        ItemStore::in_memory(reset)
    } else {
        let path = config
            .server
            .data_file
            .clone()
            .map_or_else(default_data_file, Ok)?;
        ItemStore::open(path, reset).await?
    };

    let addr: SocketAddr = config.server.addr.parse()?;
    let cors_origins = clean_origins(&config.server.cors_origins);
    info!("CORS origins: {}", cors_origins.join(", "));

    let app = server::app(Arc::new(AppState::new(store)), cors_origins);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            report_server_error(addr, Path::new(get_log_file_path()), &e);
            return Err(e.into());
        }
    };

    info!("Starting item service on {addr}");
    server::serve(listener, app, shutdown_signal()).await?;
    info!("Item service stopped");
    Ok(())
}

fn connect(config: &AppConfig) -> Result<Controller> {
    let voter_token = config
        .client
        .voter_token
        .clone()
        .map_or_else(|| load_or_create_voter_token(&config_dir()?), Ok)?;
    let api = HttpApi::new(
        &config.client.server_url,
        Some(voter_token),
        config.client.request_timeout,
    )?;
    info!(server = %api.base_url(), "Connecting to item service");
    Ok(Controller::new(
        Arc::new(api),
        Arc::new(TerminalView::new()),
        Arc::new(TokioScheduler),
        SyncSettings::from_config(&config.client, config.bubble),
    ))
}

/// Load the current list; client commands cannot do anything without it.
async fn initial_refresh(controller: &Controller, config: &AppConfig) -> Result<()> {
    if controller.refresh().await == RefreshOutcome::Failed {
        bail!("Could not reach {}", config.client.server_url);
    }
    Ok(())
}

pub async fn run_watch(config: &AppConfig) -> Result<()> {
    let controller = connect(config)?;
    if controller.start().await == RefreshOutcome::Failed {
        eprintln!(
            "Could not reach {} yet; retrying every {}",
            config.client.server_url,
            humantime::format_duration(config.client.poll_interval)
        );
    }
    shutdown_signal().await;
    controller.stop().await;
    Ok(())
}

pub async fn run_add(config: &AppConfig, name: &str) -> Result<()> {
    let controller = connect(config)?;
    initial_refresh(&controller, config).await?;
    match controller.add_item(name).await {
        AddOutcome::Added(item) => {
            info!(id = item.id, "Added item");
            Ok(())
        }
        AddOutcome::Rejected => bail!("Item name must not be blank"),
        AddOutcome::Busy => bail!("Another add is still in progress"),
        AddOutcome::Failed(message) => bail!("Could not add item: {message}"),
    }
}

pub async fn run_vote(config: &AppConfig, id: ItemId) -> Result<()> {
    let controller = connect(config)?;
    initial_refresh(&controller, config).await?;
    match controller.vote(id).await {
        VoteOutcome::Counted { votes } => {
            info!(id, votes, "Vote counted");
            Ok(())
        }
        VoteOutcome::Failed => bail!("Vote for item {id} was not counted"),
        VoteOutcome::NotVisible => bail!("No item with id {id}"),
    }
}

pub fn report_server_error(addr: SocketAddr, log_file: &Path, e: &std::io::Error) {
    if e.kind() == std::io::ErrorKind::AddrInUse {
        eprintln!();
        eprintln!("Error: Failed to start server - address {addr} is already in use");
        eprintln!();
        eprintln!("Another instance of bubble-vote may already be running.");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  1. Stop the existing process:   pkill bubble-vote");
        eprintln!("  2. Use a different port:        bubble-vote serve --addr 0.0.0.0:5001");
        eprintln!("  3. Check what's using the port: lsof -i :{}", addr.port());
        eprintln!();
        eprintln!("Logs: {}", log_file.display());
        eprintln!();
        return;
    }
    eprintln!();
    eprintln!("Error: Failed to start server: {e}");
    eprintln!();
    eprintln!("Logs: {}", log_file.display());
    eprintln!();
}
