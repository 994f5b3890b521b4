use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use huddle_server::{FileStore, RetryPolicy, RoomConfig, RoomStore, ServerConfig};
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "huddle", version, about = "Room signaling server for WebRTC calls")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling HTTP server.
    Serve {
        #[arg(long, env = "HUDDLE_BIND", default_value = "0.0.0.0:8787")]
        bind: SocketAddr,

        /// Persist rooms here; without it rooms live in memory only.
        #[arg(long, env = "HUDDLE_DATA_DIR")]
        data_dir: Option<PathBuf>,

        #[arg(long, default_value = "256")]
        mailbox_capacity: NonZeroUsize,

        #[arg(long, default_value_t = 3)]
        store_retries: u32,

        #[arg(long, default_value_t = 50)]
        store_backoff_ms: u64,

        /// Used when RUST_LOG is not set.
        #[arg(long, default_value = "info")]
        log_level: String,
    },

    /// List the rooms persisted in a data directory.
    Rooms {
        #[arg(long, env = "HUDDLE_DATA_DIR")]
        data_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Serve {
            bind,
            data_dir,
            mailbox_capacity,
            store_retries,
            store_backoff_ms,
            log_level,
        } => {
            init_tracing(&log_level);

            let config = ServerConfig {
                bind_addr: bind,
                data_dir,
                room: RoomConfig {
                    mailbox_capacity: mailbox_capacity.get(),
                    ..RoomConfig::default()
                },
                store_retry: RetryPolicy {
                    attempts: store_retries,
                    backoff: Duration::from_millis(store_backoff_ms),
                },
            };

            println!("{}", "Starting huddle signaling server...".green().bold());
            huddle_server::run(config, shutdown_signal()).await?;
        }

        Commands::Rooms { data_dir } => list_rooms(data_dir).await?,
    }

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}

async fn list_rooms(data_dir: PathBuf) -> Result<()> {
    let store = FileStore::open(&data_dir)
        .await
        .with_context(|| format!("Failed to open {}", data_dir.display()))?;
    let mut rooms = store.load_all().await.context("Failed to read room records")?;
    rooms.sort_by(|a, b| a.id().cmp(b.id()));

    if rooms.is_empty() {
        println!("{}", "No persisted rooms.".yellow());
        return Ok(());
    }

    for room in &rooms {
        println!(
            "{} {}",
            room.id().to_string().cyan().bold(),
            format!("({} participants)", room.participants().len()).dimmed()
        );
        for participant in room.participants() {
            println!(
                "   {} {}  {} pending",
                participant.session_id.to_string().green(),
                participant.name,
                room.pending(&participant.session_id)
            );
        }
    }

    Ok(())
}
