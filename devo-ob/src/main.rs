//! devo-ob - classify a bulk devotee paste against the database
//!
//! Reads `name,email,phone` lines from a file (or stdin with `-`), scores
//! them against the stored population and prints the session snapshot as
//! JSON. With `--approve-clean`, candidates not flagged as possible
//! duplicates are inserted.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use devo_common::config::{self, TomlConfig};
use devo_common::events::EventBus;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use devo_ob::{OnboardingSession, SqliteRecordStore};

#[derive(Parser, Debug)]
#[command(name = "devo-ob", version, about = "Devotee onboarding with duplicate detection")]
struct Args {
    /// Root folder holding devo.db
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a bulk paste and print the result
    Classify {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Insert every candidate not flagged as a possible duplicate
        #[arg(long)]
        approve_clean: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = match args.config.clone().or_else(config::default_config_path) {
        Some(path) => TomlConfig::load_or_default(&path),
        None => TomlConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting devo-ob v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path = config::database_path(&root_folder);
    info!("Database: {}", db_path.display());

    let pool = devo_common::db::init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let events = EventBus::new(toml_config.event_capacity);
    let session = OnboardingSession::new(Arc::new(SqliteRecordStore::new(pool)))
        .with_events(events);

    match args.command {
        Command::Classify { input, approve_clean } => {
            let raw = read_input(&input)?;
            let batch = session.classify_batch_from_store(&raw).await;
            info!(
                "Parsed {} candidates, {} possible duplicates",
                batch.len(),
                batch.iter().filter(|c| c.is_duplicate).count()
            );

            if approve_clean {
                for (ticket, outcome) in session.approve_all_clean().await {
                    if let Err(e) = outcome {
                        warn!(%ticket, "Approval failed: {}", e);
                    }
                }
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);

    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read stdin")?;
        return Ok(raw);
    }

    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}
