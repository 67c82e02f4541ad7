//! # synctrack
//!
//! Replays recorded sync event traces through a status tree.
//!
//! ## Commands
//!
//! - `replay`: Apply a trace, printing each harvested batch of changes
//! - `query`: Apply a trace, printing only the states of given paths
//!
//! ## Example
//!
//! ```bash
//! # Harvest every 100 events and show the final state of /photos
//! synctrack replay trace.jsonl --harvest-every 100 --query /photos
//!
//! # Where do these paths stand once the trace is applied?
//! synctrack query trace.jsonl /photos /docs/report.pdf
//! ```
//!
//! A trace holds one JSON event per line:
//!
//! ```text
//! {"type":"queued","id":7,"path":"/photos/a.jpg","total_bytes":2048}
//! {"type":"in_progress","id":7,"path":"/photos/a.jpg","transferred_bytes":512,"total_bytes":2048}
//! {"type":"completed","id":7,"path":"/photos/a.jpg"}
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod logging;
mod trace;

use config::Config;
use logging::Verbosity;

/// Replays recorded sync event traces through a status tree.
#[derive(Parser, Debug)]
#[command(name = "synctrack")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply a trace and print harvested changes
    Replay {
        /// JSON-lines trace file
        trace: PathBuf,

        /// Harvest after this many events (0 = only at the end)
        #[arg(long)]
        harvest_every: Option<usize>,

        /// Path to report once the trace is applied (repeatable)
        #[arg(long)]
        query: Vec<String>,
    },

    /// Apply a trace and print the states of the given paths
    Query {
        /// JSON-lines trace file
        trace: PathBuf,

        /// Paths to report
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    logging::init(
        Verbosity::from_flags(cli.verbose, cli.quiet),
        &config.logging.level,
    )
    .context("Failed to initialize logging")?;

    if let Some(path) = &cli.config {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Replay {
            trace,
            harvest_every,
            query,
        } => {
            commands::replay::run(&trace, harvest_every, &query, &config, &mut out).await?;
        }
        Commands::Query { trace, paths } => {
            commands::query::run(&trace, &paths, &config, &mut out).await?;
        }
    }

    Ok(())
}
