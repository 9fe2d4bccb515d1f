//! Conferia CLI
//!
//! Registers materials, prints their QR tokens, records conference scans and
//! shows dashboard statistics. All state lives in a local SQLite database
//! under `~/.conferia` (override with `CONFERIA_HOME` or `--db`).

use clap::{Parser, Subcommand};
use conferia_logging::{init_logging, LogConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

use cli::material::MaterialAction;
use cli::sector::SectorAction;

#[derive(Parser, Debug)]
#[command(name = "conferia", about = "Material control with QR conference", version)]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Database file (default: ~/.conferia/conferia.sqlite3)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage registered materials
    Material {
        #[command(subcommand)]
        action: MaterialAction,
    },
    /// Record a conference scan for a QR token
    Scan {
        /// QR token decoded from the scanned code
        token: String,
        /// Sector where the material was found
        sector: String,
        /// Room where the material was found
        room: String,
        #[arg(long)]
        json: bool,
    },
    /// Inspect the sector/room directory
    Sector {
        #[command(subcommand)]
        action: SectorAction,
    },
    /// Show dashboard statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(LogConfig {
        app_name: "conferia",
        verbose: cli.verbose,
    }) {
        eprintln!("Warning: logging not initialized: {e:#}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = cli::context::CliContext::open(cli.db.as_deref()).await?;

    match cli.command {
        Commands::Material { action } => cli::material::run(&ctx, action).await,
        Commands::Scan {
            token,
            sector,
            room,
            json,
        } => cli::scan::run(&ctx, &token, &sector, &room, json).await,
        Commands::Sector { action } => cli::sector::run(&ctx, action).await,
        Commands::Stats { json } => cli::stats::run(&ctx, json).await,
    }
}
